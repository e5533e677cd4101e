//! Connections.json parsing
//!
//! Live-connection reports keep their target in a Connections.json file whose
//! first connection string names the server, catalog, and cube.

use crate::error::{PbixError, PbixResult};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct ConnectionsFile {
    #[serde(rename = "Connections", default)]
    connections: Vec<Connection>,
}

#[derive(Debug, Deserialize)]
struct Connection {
    #[serde(rename = "ConnectionString", default)]
    connection_string: Option<String>,
}

/// Server/database/cube pulled from a connection string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionDetails {
    pub server: Option<String>,
    pub db_name: Option<String>,
    pub object_name: Option<String>,
}

impl ConnectionDetails {
    /// True when no field was present
    pub fn is_empty(&self) -> bool {
        self.server.is_none() && self.db_name.is_none() && self.object_name.is_none()
    }
}

/// Parse the first connection of a Connections.json file
pub fn extract_connection_details(path: &Path) -> PbixResult<ConnectionDetails> {
    let content = std::fs::read_to_string(path).map_err(|e| PbixError::IoWithPath {
        path: path.display().to_string(),
        source: e,
    })?;
    let file: ConnectionsFile =
        serde_json::from_str(&content).map_err(|e| PbixError::ConnectionsParse {
            path: path.display().to_string(),
            source: e,
        })?;

    let Some(connection_string) = file
        .connections
        .first()
        .and_then(|c| c.connection_string.as_deref())
    else {
        return Ok(ConnectionDetails::default());
    };

    Ok(parse_connection_string(connection_string))
}

/// Split a `key=value;key=value` connection string into its lineage fields
pub fn parse_connection_string(connection_string: &str) -> ConnectionDetails {
    let mut details = ConnectionDetails::default();

    for part in connection_string.split(';') {
        let lower = part.to_lowercase();
        let value = || part.splitn(2, '=').nth(1).map(|v| v.trim_matches('"').to_string());
        if lower.starts_with("data source=") {
            details.server = value();
        } else if lower.starts_with("initial catalog=") {
            details.db_name = value();
        } else if lower.starts_with("cube=") {
            details.object_name = value();
        }
    }

    details
}
