//! Report folder scanning
//!
//! An extracted report reveals its upstream sources through one of three
//! layouts, checked in priority order: a `Connections.json` (live cube
//! connection), a Mashup `Section1.m` (legacy Power Query section), or a
//! TMDL model under `Model/`. Reports matching none are logged and skipped.

use crate::connections::extract_connection_details;
use crate::error::PbixResult;
use crate::mashup::extract_mashup_sources;
use crate::tmdl::{partition_sources, query_order, read_tmdl};
use lm_core::{LineageRecord, ObjectType, SourceSystem};
use log::{info, warn};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

const CONNECTIONS_FILE: &str = "Connections.json";
const MASHUP_SECTION: &str = "Mashup/Package/Formulas/Section1.m";
const MODEL_TMDL: &str = "Model/model.tmdl";

/// One upstream object a report reads from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReportMetadata {
    /// Report folder path relative to the scan root
    pub execute_path: String,
    /// Report name (folder name)
    pub name: String,
    pub server: Option<String>,
    pub db: Option<String>,
    pub schema: Option<String>,
    pub object_name: Option<String>,
    pub object_type: Option<ObjectType>,
    pub query: Option<String>,
}

impl ReportMetadata {
    fn new(execute_path: &str, name: &str) -> Self {
        Self {
            execute_path: execute_path.to_string(),
            name: name.to_string(),
            server: None,
            db: None,
            schema: None,
            object_name: None,
            object_type: None,
            query: None,
        }
    }
}

fn is_report_folder(folder: &Path) -> bool {
    folder.join(CONNECTIONS_FILE).exists()
        || folder.join(MASHUP_SECTION).exists()
        || folder.join(MODEL_TMDL).exists()
}

/// Find extracted report folders under a root directory
pub fn report_folders(root: &Path) -> PbixResult<Vec<PathBuf>> {
    let mut folders = Vec::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(current) = stack.pop() {
        for entry in std::fs::read_dir(&current)? {
            let path = entry?.path();
            if !path.is_dir() {
                continue;
            }
            if is_report_folder(&path) {
                folders.push(path);
            } else {
                stack.push(path);
            }
        }
    }

    folders.sort();
    Ok(folders)
}

/// Scan every report folder under `root` into metadata rows
pub fn scan_reports(root: &Path, reserved: &HashSet<String>) -> PbixResult<Vec<ReportMetadata>> {
    let mut all = Vec::new();

    for folder in report_folders(root)? {
        let execute_path = folder
            .strip_prefix(root)
            .unwrap_or(&folder)
            .to_string_lossy()
            .replace('\\', "/");
        let rows = extract_report(&folder, &execute_path, reserved);
        all.extend(rows);
    }

    // Duplicate folders (same report exported under two paths) produce
    // identical rows
    let mut seen: HashSet<ReportMetadata> = HashSet::new();
    all.retain(|row| seen.insert(row.clone()));
    Ok(all)
}

/// Extract metadata rows from one report folder
pub fn extract_report(
    folder: &Path,
    execute_path: &str,
    reserved: &HashSet<String>,
) -> Vec<ReportMetadata> {
    let name = folder
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let connections_path = folder.join(CONNECTIONS_FILE);
    if connections_path.exists() {
        match extract_connection_details(&connections_path) {
            Ok(details) => {
                let mut row = ReportMetadata::new(execute_path, &name);
                row.server = details.server.clone();
                row.db = details.db_name.clone();
                row.object_name = details.object_name.clone();
                row.object_type = Some(ObjectType::Cube);
                let mut rows = vec![row];
                if details.is_empty() && folder.join(MODEL_TMDL).exists() {
                    rows.extend(model_rows(folder, execute_path, &name));
                }
                return rows;
            }
            Err(e) => warn!("{}: {e}", connections_path.display()),
        }
    }

    let mashup_path = folder.join(MASHUP_SECTION);
    if mashup_path.exists() {
        match std::fs::read_to_string(&mashup_path) {
            Ok(m_code) => {
                return extract_mashup_sources(&m_code, reserved)
                    .into_iter()
                    .map(|s| {
                        let mut row = ReportMetadata::new(execute_path, &name);
                        row.server = Some(s.server);
                        row.db = Some(s.db);
                        row.schema = Some(s.schema);
                        row.object_name = s.object_name;
                        row.object_type = Some(s.object_type);
                        row.query = Some(s.query);
                        row
                    })
                    .collect();
            }
            Err(e) => warn!("{}: {e}", mashup_path.display()),
        }
    }

    if folder.join(MODEL_TMDL).exists() {
        return model_rows(folder, execute_path, &name);
    }

    info!("No extraction strategy for {name} in {}", folder.display());
    Vec::new()
}

/// Metadata rows from a TMDL model: one per partition source of each table
/// in the query order.
fn model_rows(folder: &Path, execute_path: &str, name: &str) -> Vec<ReportMetadata> {
    let model_path = folder.join(MODEL_TMDL);
    let content = match read_tmdl(&model_path) {
        Ok(content) => content,
        Err(e) => {
            warn!("{}: {e}", model_path.display());
            return Vec::new();
        }
    };

    let mut rows = Vec::new();
    for table in query_order(&content) {
        let table_path = folder.join("Model/tables").join(format!("{table}.tmdl"));
        let table_content = match read_tmdl(&table_path) {
            Ok(content) => content,
            Err(_) => {
                info!("Not found: {}", table_path.display());
                continue;
            }
        };
        let Some(sources) = partition_sources(&table_content) else {
            continue;
        };
        for source in sources {
            let mut row = ReportMetadata::new(execute_path, name);
            row.server = Some(source.server);
            row.db = Some(source.db);
            row.schema = Some(source.schema);
            row.object_name = Some(source.object);
            row.object_type = Some(ObjectType::Table);
            rows.push(row);
        }
    }

    if rows.is_empty() {
        info!("One-time report (no importable partitions): {name}");
    }
    rows
}

/// Convert metadata rows to the common record shape
pub fn to_records(rows: Vec<ReportMetadata>) -> Vec<LineageRecord> {
    rows.into_iter()
        .map(|row| {
            let mut record = LineageRecord::new(SourceSystem::PowerBi);
            record.parent_db = row.db;
            record.parent_schema = row.schema;
            record.source_tables = row.object_name.into_iter().collect();
            record.sql_statement = row.query;
            record.object_type = row.object_type;
            record.object_name = Some(row.execute_path);
            record
        })
        .collect()
}

#[cfg(test)]
#[path = "metadata_test.rs"]
mod tests;
