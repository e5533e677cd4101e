//! Qualified object name parsing
//!
//! Catalog references arrive as anything from a bare table name up to a
//! four-part `server.db.schema.table`. Missing parts are filled from
//! configured defaults so every reference resolves to the same shape.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Default schema assumed when a reference carries none
pub const DEFAULT_SCHEMA: &str = "dbo";

/// Defaults used to complete partially-qualified names
#[derive(Debug, Clone, Default)]
pub struct NameDefaults {
    /// Server assumed when the reference carries none
    pub server: String,

    /// Databases that live on a different server than the default
    /// (key: database name, value: its server)
    pub server_overrides: HashMap<String, String>,
}

impl NameDefaults {
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            server_overrides: HashMap::new(),
        }
    }

    fn server_for(&self, db: &str) -> String {
        self.server_overrides
            .get(db)
            .cloned()
            .unwrap_or_else(|| self.server.clone())
    }
}

/// A fully-resolved object reference
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectRef {
    pub server: String,
    pub database: Option<String>,
    pub schema: String,
    pub object: String,
}

impl ObjectRef {
    /// Split a dotted reference into its parts, filling gaps from defaults.
    ///
    /// - 4 parts: taken verbatim as server.db.schema.object
    /// - 3 parts: db.schema.object on the default server (or the db's
    ///   configured override server)
    /// - 2 parts: schema.object in `default_db`
    /// - 1 part: object in `default_db`, schema `dbo`
    ///
    /// Returns `None` for empty input.
    pub fn parse(name: &str, default_db: Option<&str>, defaults: &NameDefaults) -> Option<Self> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let parts: Vec<&str> = name.split('.').collect();
        match parts.as_slice() {
            [server, db, schema, object] => Some(Self {
                server: server.to_string(),
                database: Some(db.to_string()),
                schema: schema.to_string(),
                object: object.to_string(),
            }),
            [db, schema, object] => Some(Self {
                server: defaults.server_for(db),
                database: Some(db.to_string()),
                schema: schema.to_string(),
                object: object.to_string(),
            }),
            [schema, object] => Some(Self {
                server: defaults.server.clone(),
                database: default_db.map(str::to_string),
                schema: schema.to_string(),
                object: object.to_string(),
            }),
            [object] => Some(Self {
                server: defaults.server.clone(),
                database: default_db.map(str::to_string),
                schema: DEFAULT_SCHEMA.to_string(),
                object: object.to_string(),
            }),
            _ => None,
        }
    }
}

/// Strip a redundant `db.` prefix from `db.schema.table` references and
/// deduplicate, preserving first-seen order.
///
/// Lists shorter than two entries are returned untouched; there is nothing
/// to deduplicate and the single entry may legitimately carry its prefix.
pub fn strip_db_prefix(db_name: &str, schema_name: &str, tables: Vec<String>) -> Vec<String> {
    if tables.len() < 2 {
        return tables;
    }

    let db_prefix = format!("{}.", db_name);
    let db_schema_prefix = format!("{}{}.", db_prefix, schema_name);
    let mut seen: HashSet<String> = HashSet::new();
    let mut result = Vec::new();

    for table in tables {
        let name = if table.starts_with(&db_schema_prefix) {
            table[db_prefix.len()..].to_string()
        } else {
            table
        };
        if seen.insert(name.clone()) {
            result.push(name);
        }
    }

    result
}

#[cfg(test)]
#[path = "object_ref_test.rs"]
mod tests;
