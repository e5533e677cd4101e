//! Report definition XML parsing
//!
//! RDL documents come in several namespace vintages, so the namespace is
//! taken from whatever the root element declares. Reports resolve their
//! datasets through named data sources; shared-dataset definitions point
//! straight at a data source reference.

use crate::error::{SsrsError, SsrsResult};
use lm_sql::SqlCleaner;
use regex::Regex;
use roxmltree::{Document, Node};
use std::collections::HashMap;
use std::sync::OnceLock;

static DATA_SOURCE_RE: OnceLock<Regex> = OnceLock::new();
static INITIAL_CATALOG_RE: OnceLock<Regex> = OnceLock::new();
static NON_EMPTY_RE: OnceLock<Regex> = OnceLock::new();

fn data_source_regex() -> &'static Regex {
    DATA_SOURCE_RE.get_or_init(|| Regex::new(r"Data Source=([^;]+)").expect("valid regex"))
}

fn initial_catalog_regex() -> &'static Regex {
    INITIAL_CATALOG_RE
        .get_or_init(|| Regex::new(r#"Initial Catalog="?([^;"]+)"?"#).expect("valid regex"))
}

fn non_empty_regex() -> &'static Regex {
    NON_EMPTY_RE.get_or_init(|| Regex::new(r"(?i)select non empty").expect("valid regex"))
}

/// Whether the definition is a full report or a shared dataset file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Report,
    SharedDataset,
}

/// How a dataset gets its rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Plain SQL query
    Sql,
    /// Stored procedure call
    Sp,
    /// MDX against Analysis Services
    Ssas,
}

/// Server/database pair resolved from a data source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataSourceInfo {
    pub server: Option<String>,
    pub database: Option<String>,
}

/// One dataset of a report definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    pub name: String,
    pub server: String,
    pub db: Option<String>,
    /// Cleaned command text (brackets and comments removed, lowercased)
    pub sql: String,
    /// `path -> to -> dataset` reference, when the dataset is shared
    pub shared_data_set: Option<String>,
    pub command_kind: CommandKind,
}

/// Pull server and database out of a connection string
pub fn extract_server_db(connect_string: &str) -> DataSourceInfo {
    DataSourceInfo {
        server: data_source_regex()
            .captures(connect_string)
            .map(|c| c[1].to_string()),
        database: initial_catalog_regex()
            .captures(connect_string)
            .map(|c| c[1].to_string()),
    }
}

fn find_child<'a>(node: &Node<'a, 'a>, ns: &str, name: &str) -> Option<Node<'a, 'a>> {
    node.descendants()
        .find(|n| n.has_tag_name((ns, name)))
}

/// Data sources of a report, keyed by name
fn find_data_sources(doc: &Document<'_>, ns: &str, default_server: &str) -> HashMap<String, DataSourceInfo> {
    let mut sources = HashMap::new();

    for ds in doc
        .descendants()
        .filter(|n| n.has_tag_name((ns, "DataSource")))
    {
        let Some(name) = ds.attribute("Name") else {
            continue;
        };
        let connect = find_child(&ds, ns, "ConnectString").and_then(|n| n.text());
        let reference = find_child(&ds, ns, "DataSourceReference").and_then(|n| n.text());

        let info = if let Some(connect) = connect {
            extract_server_db(connect)
        } else if let Some(reference) = reference {
            // Shared data source: the reference path ends in the database name
            DataSourceInfo {
                server: Some(default_server.to_string()),
                database: reference.rsplit('/').next().map(str::to_string),
            }
        } else {
            DataSourceInfo::default()
        };
        sources.insert(name.to_string(), info);
    }

    sources
}

/// Parse a report definition into its datasets.
///
/// `default_server` fills in for data sources that only carry a reference.
pub fn parse_datasets(
    name: &str,
    xml: &str,
    kind: ReportKind,
    default_server: &str,
) -> SsrsResult<Vec<Dataset>> {
    let doc = Document::parse(xml).map_err(|e| SsrsError::DefinitionParse {
        name: name.to_string(),
        message: e.to_string(),
    })?;
    let ns = doc.root_element().tag_name().namespace().unwrap_or("");
    let data_sources = if kind == ReportKind::Report {
        find_data_sources(&doc, ns, default_server)
    } else {
        HashMap::new()
    };

    let mut datasets = Vec::new();
    for ds in doc
        .descendants()
        .filter(|n| n.has_tag_name((ns, "DataSet")))
    {
        let ds_name = ds.attribute("Name").unwrap_or_default().to_string();
        let source_name = find_child(&ds, ns, "DataSourceName").and_then(|n| n.text());
        let command_text = find_child(&ds, ns, "CommandText").and_then(|n| n.text());
        let has_command_type = find_child(&ds, ns, "CommandType").is_some();
        let shared_ref = find_child(&ds, ns, "SharedDataSetReference").and_then(|n| n.text());
        let source_ref = find_child(&ds, ns, "DataSourceReference").and_then(|n| n.text());

        let server_db = match kind {
            ReportKind::Report => source_name
                .and_then(|n| data_sources.get(n))
                .cloned()
                .unwrap_or_default(),
            ReportKind::SharedDataset => DataSourceInfo {
                server: None,
                database: source_ref
                    .and_then(|r| r.rsplit('/').next())
                    .map(str::to_lowercase),
            },
        };

        let sql = command_text
            .map(|sql| {
                SqlCleaner::new(sql)
                    .remove_brackets()
                    .remove_comments()
                    .into_sql()
                    .to_lowercase()
            })
            .unwrap_or_default();

        let command_kind = if has_command_type || sql.starts_with("exec") {
            CommandKind::Sp
        } else if non_empty_regex().is_match(&sql) {
            CommandKind::Ssas
        } else {
            CommandKind::Sql
        };

        datasets.push(Dataset {
            name: ds_name,
            server: server_db
                .server
                .map(|s| s.to_lowercase())
                .unwrap_or_else(|| default_server.to_string()),
            db: server_db.database.map(|d| d.to_lowercase()),
            sql,
            shared_data_set: shared_ref.map(|r| r.trim_start_matches('/').replace('/', " -> ")),
            command_kind,
        });
    }

    Ok(datasets)
}

#[cfg(test)]
#[path = "rdl_test.rs"]
mod tests;
