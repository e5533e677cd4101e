//! Dataset object extraction and row assembly
//!
//! Each parsed dataset resolves to the objects it reads: the shared-dataset
//! reference, the stored procedure it executes, or the tables of its SQL
//! text. Rows then flatten into the common record shape.

use crate::rdl::{parse_datasets, CommandKind, Dataset, ReportKind};
use lm_core::{Config, LineageRecord, ObjectType, SourceSystem};
use lm_sql::{extract_relations, SqlCleaner};
use log::{error, info};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

static OBJECT_REF_RE: OnceLock<Regex> = OnceLock::new();

/// Wider capture than the lineage classifier: EXEC counts, and parentheses
/// from subqueries are stripped rather than rejected.
fn object_ref_regex() -> &'static Regex {
    OBJECT_REF_RE.get_or_init(|| {
        Regex::new(r"(?i)\b(?:FROM|JOIN|UPDATE|INTO|MERGE|USING|EXEC)\s+([\w\-\.\(\)]+)")
            .expect("valid regex")
    })
}

/// A report definition row as fetched from the report server catalog
#[derive(Debug, Clone)]
pub struct ReportDefinition {
    pub name: String,
    /// Folder path of the report on the server
    pub path: String,
    pub kind: ReportKind,
    pub xml: String,
}

/// Table/procedure names referenced by a dataset query
pub fn extract_tablenames(sql: &str) -> Vec<String> {
    let mut names = BTreeSet::new();
    for cap in object_ref_regex().captures_iter(sql) {
        let name = cap[1].replace(['(', ')'], "");
        if !name.is_empty() {
            names.insert(name);
        }
    }
    names.into_iter().collect()
}

/// The objects a dataset reads, per its command classification
pub fn object_list(dataset: &Dataset) -> Vec<String> {
    if let Some(shared) = &dataset.shared_data_set {
        return vec![shared.clone()];
    }
    match dataset.command_kind {
        CommandKind::Sql => {
            // Well-formed queries go through the AST; anything else falls
            // back to the keyword capture
            match extract_relations(&dataset.sql) {
                Ok(relations) if !relations.is_empty() => relations.into_iter().collect(),
                _ => extract_tablenames(&dataset.sql),
            }
        }
        CommandKind::Sp => {
            let sql = dataset.sql.trim();
            match sql.strip_prefix("exec ") {
                Some(rest) => vec![rest.to_string()],
                None => vec![sql.to_string()],
            }
        }
        CommandKind::Ssas => Vec::new(),
    }
}

/// Extract lineage records from a batch of report definitions.
///
/// Reports under excluded paths are skipped; definitions that fail to parse
/// are logged and skipped.
pub fn extract_reports(reports: &[ReportDefinition], config: &Config) -> Vec<LineageRecord> {
    let defaults = config.name_defaults();
    let mut records = Vec::new();

    for report in reports {
        if config.is_excluded_path(&report.path) {
            info!("Skipping excluded report path: {}", report.path);
            continue;
        }

        let datasets = match parse_datasets(
            &report.name,
            &report.xml,
            report.kind,
            &config.default_server,
        ) {
            Ok(datasets) => datasets,
            Err(e) => {
                error!("{e}");
                continue;
            }
        };

        for dataset in &datasets {
            let objects = object_list(dataset);
            if dataset.command_kind == CommandKind::Sql
                && dataset.shared_data_set.is_none()
                && objects.is_empty()
            {
                continue;
            }

            if dataset.shared_data_set.is_some() {
                for object in &objects {
                    records.push(shared_dataset_record(report, config, object));
                }
            } else {
                match dataset.command_kind {
                    CommandKind::Sp => {
                        for object in &objects {
                            records.push(sp_record(report, dataset, object));
                        }
                    }
                    CommandKind::Sql => {
                        for object in &objects {
                            records.push(sql_record(report, dataset, object, &defaults));
                        }
                    }
                    CommandKind::Ssas => {
                        records.push(ssas_record(report, dataset));
                    }
                }
            }
        }
    }

    records
}

fn base_record(report: &ReportDefinition) -> LineageRecord {
    let mut record = LineageRecord::new(SourceSystem::Ssrs);
    record.object_name = Some(report.path.clone());
    record
}

/// Shared datasets live on the report server itself
fn shared_dataset_record(
    report: &ReportDefinition,
    config: &Config,
    object: &str,
) -> LineageRecord {
    let mut record = base_record(report);
    record.parent_db = Some(config.report_server_db.clone());
    record.parent_schema = Some(lm_core::DEFAULT_SCHEMA.to_string());
    record.source_tables = vec![object.to_string()];
    record.object_type = Some(ObjectType::SharedDataset);
    record
}

fn sp_record(report: &ReportDefinition, dataset: &Dataset, object: &str) -> LineageRecord {
    let cleaned = SqlCleaner::new(object).remove_brackets().into_sql();
    let (schema, name) = match cleaned.split_once('.') {
        Some((schema, name)) => (schema.to_string(), name.to_string()),
        None => (lm_core::DEFAULT_SCHEMA.to_string(), cleaned),
    };
    let mut record = base_record(report);
    record.parent_db = dataset.db.clone();
    record.parent_schema = Some(schema);
    record.source_tables = vec![name];
    record.sql_statement = Some(dataset.sql.clone());
    record.object_type = Some(ObjectType::Sp);
    record
}

fn sql_record(
    report: &ReportDefinition,
    dataset: &Dataset,
    object: &str,
    defaults: &lm_core::NameDefaults,
) -> LineageRecord {
    let mut record = base_record(report);
    record.sql_statement = Some(dataset.sql.clone());
    record.object_type = Some(ObjectType::Table);

    match lm_core::ObjectRef::parse(object, dataset.db.as_deref(), defaults) {
        Some(reference) => {
            record.parent_db = reference.database;
            record.parent_schema = Some(reference.schema);
            record.source_tables = vec![reference.object];
        }
        None => {
            record.parent_db = dataset.db.clone();
            record.source_tables = vec![object.to_string()];
        }
    }
    record
}

/// SSAS datasets have no table reference; the dataset name stands in for
/// the cube slice.
fn ssas_record(report: &ReportDefinition, dataset: &Dataset) -> LineageRecord {
    let mut record = base_record(report);
    record.parent_db = dataset.db.clone();
    record.parent_schema = Some(lm_core::DEFAULT_SCHEMA.to_string());
    record.source_tables = vec![dataset.name.clone()];
    record.object_type = Some(ObjectType::Cube);
    record
}

#[cfg(test)]
#[path = "objects_test.rs"]
mod tests;
