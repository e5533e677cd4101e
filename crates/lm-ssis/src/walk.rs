//! Walking an exported SSIS tree
//!
//! The SSIS catalog provides which packages ran under which master; the walk
//! loads each package file, pulls task lineage and package links, and keeps
//! going past any package that fails to parse.

use crate::conmgr::ConnectionManagers;
use crate::package::{Package, TaskKind, TaskLineage};
use lm_core::{LineageRecord, ObjectType, SourceSystem};
use lm_sql::tables;
use log::error;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

/// One row of the package index: a package that runs under a master package
/// inside a project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageIndexEntry {
    pub project: String,
    pub master: String,
    pub package: String,
}

/// The package index plus the export directory its files live under
#[derive(Debug, Clone)]
pub struct PackageIndex {
    root: PathBuf,
    entries: Vec<PackageIndexEntry>,
}

impl PackageIndex {
    pub fn new(root: impl Into<PathBuf>, entries: Vec<PackageIndexEntry>) -> Self {
        Self {
            root: root.into(),
            entries,
        }
    }

    /// Where a package file lives: `<root>/<project>/<package>`
    pub fn file_path(&self, project: &str, package: &str) -> PathBuf {
        self.root.join(project).join(package)
    }

    /// Entries grouped project -> master -> member packages
    pub fn grouped(&self) -> BTreeMap<&str, BTreeMap<&str, Vec<&str>>> {
        let mut grouped: BTreeMap<&str, BTreeMap<&str, Vec<&str>>> = BTreeMap::new();
        for entry in &self.entries {
            grouped
                .entry(entry.project.as_str())
                .or_default()
                .entry(entry.master.as_str())
                .or_default()
                .push(entry.package.as_str());
        }
        grouped
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Execute Package edge with its project context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageLink {
    pub project: String,
    pub master: String,
    pub parent: String,
    pub child: String,
}

/// Precedence edge between two tasks of one package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskLink {
    pub project: String,
    pub package: String,
    pub from: String,
    pub to: String,
}

/// Everything the SSIS walk produced
#[derive(Debug, Default)]
pub struct SsisExtraction {
    pub records: Vec<LineageRecord>,
    pub package_links: Vec<PackageLink>,
    pub task_links: Vec<TaskLink>,
    /// (master:package, message) for every package that failed to parse
    pub errors: Vec<(String, String)>,
}

/// Walk every indexed package, collecting lineage records and graph links.
/// Parse failures are logged, recorded, and skipped.
pub fn extract_index(
    index: &PackageIndex,
    conmgrs: &ConnectionManagers,
    naming_overrides: &HashMap<String, String>,
    reserved: &HashSet<String>,
) -> SsisExtraction {
    let mut out = SsisExtraction::default();

    for (project, masters) in index.grouped() {
        for (master, packages) in masters {
            for package_name in packages {
                let path = index.file_path(project, package_name);
                if let Err(message) =
                    extract_package(&path, project, master, package_name, conmgrs, naming_overrides, reserved, &mut out)
                {
                    error!("Error processing {master}:{package_name}: {message}");
                    out.errors
                        .push((format!("{master}:{package_name}"), message));
                }
            }
        }
    }

    out
}

#[allow(clippy::too_many_arguments)]
fn extract_package(
    path: &Path,
    project: &str,
    master: &str,
    package_name: &str,
    conmgrs: &ConnectionManagers,
    naming_overrides: &HashMap<String, String>,
    reserved: &HashSet<String>,
    out: &mut SsisExtraction,
) -> Result<(), String> {
    let package = Package::load(path).map_err(|e| e.to_string())?;

    for link in package.precedence_links().map_err(|e| e.to_string())? {
        out.task_links.push(TaskLink {
            project: project.to_string(),
            package: package_name.to_string(),
            from: link.from,
            to: link.to,
        });
    }

    for call in package.execute_package_links().map_err(|e| e.to_string())? {
        out.package_links.push(PackageLink {
            project: project.to_string(),
            master: master.to_string(),
            parent: package_name.to_string(),
            child: call.child_package,
        });
    }

    for task in package
        .task_lineage(conmgrs, naming_overrides)
        .map_err(|e| e.to_string())?
    {
        let record = task_to_record(package_name, task, reserved);
        if !out.records.contains(&record) {
            out.records.push(record);
        }
    }

    Ok(())
}

/// Convert a task entry into the common record shape.
///
/// When a task embeds SQL, the statement is authoritative: source (and for
/// Execute SQL tasks, target) tables come from the text rather than the
/// component's OpenRowset selection.
fn task_to_record(
    package_name: &str,
    task: TaskLineage,
    reserved: &HashSet<String>,
) -> LineageRecord {
    let mut record = LineageRecord::new(SourceSystem::Ssis);
    record.parent_db = task.parent_db;
    record.child_db = task.child_db;
    record.object_name = Some(match &task.object_name {
        Some(name) => format!("{} :: {}", package_name, name),
        None => package_name.to_string(),
    });

    match task.kind {
        TaskKind::SsasProcessing => {
            record.object_type = Some(ObjectType::Cube);
            record.target_tables = task.target_table.into_iter().collect();
        }
        TaskKind::ExecuteSql => {
            record.object_type = Some(ObjectType::Table);
            if let Some(sql) = &task.sql_statement {
                let lineage = tables::table_lineage(sql, reserved);
                record.target_tables = lineage.targets.into_iter().collect();
                record.source_tables = lineage.sources.into_iter().collect();
            }
            record.sql_statement = task.sql_statement;
        }
        TaskKind::DataFlow => {
            record.object_type = Some(ObjectType::Table);
            record.target_tables = task.target_table.into_iter().collect();
            record.source_tables = match &task.sql_statement {
                Some(sql) => tables::table_lineage(sql, reserved)
                    .sources
                    .into_iter()
                    .collect(),
                None => task.source_table.into_iter().collect(),
            };
            record.sql_statement = task.sql_statement;
        }
    }

    record
}

#[cfg(test)]
#[path = "walk_test.rs"]
mod tests;
