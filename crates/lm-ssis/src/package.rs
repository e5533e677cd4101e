//! DTSX package parsing
//!
//! A `.dtsx` file is a DTS-namespaced XML document whose executables hold
//! precedence constraints, Execute Package references, Execute SQL tasks,
//! data-flow component trees, and SSAS processing commands. Everything here
//! is a DOM walk; the vendor schema is stable but loosely used, so absent
//! attributes are treated as data, not errors.

use crate::conmgr::ConnectionManagers;
use crate::error::{SsisError, SsisResult};
use lm_sql::SqlCleaner;
use log::warn;
use roxmltree::{Document, Node};
use std::collections::HashMap;
use std::path::Path;

/// DTS namespace used by package and connection-manager documents
pub const DTS_NS: &str = "www.microsoft.com/SqlServer/Dts";

/// Execute SQL Task payload namespace
pub const SQLTASK_NS: &str = "www.microsoft.com/sqlserver/dts/tasks/sqltask";

/// Analysis Services engine namespace inside ProcessingCommands payloads
pub const SSAS_ENGINE_NS: &str = "http://schemas.microsoft.com/analysisservices/2003/engine";

const PROJECT_CONNECTION_PREFIX: &str = "Project.ConnectionManagers";

/// An ordering edge between two tasks of one package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrecedenceLink {
    pub from: String,
    pub to: String,
}

/// An Execute Package task and the child package it invokes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageCall {
    pub task_name: String,
    pub child_package: String,
}

/// The kind of executable a lineage entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    DataFlow,
    ExecuteSql,
    SsasProcessing,
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskKind::DataFlow => write!(f, "Data Flow Task"),
            TaskKind::ExecuteSql => write!(f, "Execute SQL Task"),
            TaskKind::SsasProcessing => write!(f, "SSAS Processing Task"),
        }
    }
}

/// One task-level lineage entry extracted from a package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskLineage {
    pub kind: TaskKind,
    pub parent_db: Option<String>,
    pub child_db: Option<String>,
    pub sql_statement: Option<String>,
    pub target_table: Option<String>,
    pub source_table: Option<String>,
    pub object_name: Option<String>,
}

/// A loaded DTSX package
#[derive(Debug, Clone)]
pub struct Package {
    name: String,
    xml: String,
}

impl Package {
    /// Read a package file from disk
    pub fn load(path: &Path) -> SsisResult<Self> {
        if !path.exists() {
            return Err(SsisError::PackageNotFound {
                path: path.display().to_string(),
            });
        }
        let xml = std::fs::read_to_string(path).map_err(|e| SsisError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { name, xml })
    }

    /// Wrap already-loaded XML (used by tests and snapshot inputs)
    pub fn from_xml(name: impl Into<String>, xml: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            xml: xml.into(),
        }
    }

    /// File name of the package
    pub fn name(&self) -> &str {
        &self.name
    }

    fn parse(&self) -> SsisResult<Document<'_>> {
        Document::parse(&self.xml).map_err(|e| SsisError::XmlParse {
            path: self.name.clone(),
            message: e.to_string(),
        })
    }

    /// All From/To pairs of the package's precedence constraints
    pub fn precedence_links(&self) -> SsisResult<Vec<PrecedenceLink>> {
        let doc = self.parse()?;
        let mut links = Vec::new();

        for constraint in doc
            .descendants()
            .filter(|n| n.has_tag_name((DTS_NS, "PrecedenceConstraint")))
        {
            let from = constraint.attribute((DTS_NS, "From"));
            let to = constraint.attribute((DTS_NS, "To"));
            if let (Some(from), Some(to)) = (from, to) {
                links.push(PrecedenceLink {
                    from: from.to_string(),
                    to: to.to_string(),
                });
            }
        }

        Ok(links)
    }

    /// Child packages invoked through enabled Execute Package tasks
    pub fn execute_package_links(&self) -> SsisResult<Vec<PackageCall>> {
        let doc = self.parse()?;
        let mut calls = Vec::new();

        for executable in enabled_executables(&doc) {
            if executable.attribute((DTS_NS, "ExecutableType"))
                != Some("Microsoft.ExecutePackageTask")
            {
                continue;
            }
            let task_name = executable
                .attribute((DTS_NS, "ObjectName"))
                .unwrap_or_default()
                .to_string();
            let child = executable
                .descendants()
                .filter(|n| n.has_tag_name("ExecutePackageTask"))
                .flat_map(|n| n.descendants())
                .find(|n| n.has_tag_name("PackageName"))
                .and_then(|n| n.text());
            if let Some(child) = child {
                calls.push(PackageCall {
                    task_name,
                    child_package: child.to_string(),
                });
            }
        }

        Ok(calls)
    }

    /// Per-task lineage entries for data flows, Execute SQL tasks, and SSAS
    /// processing tasks.
    pub fn task_lineage(
        &self,
        conmgrs: &ConnectionManagers,
        naming_overrides: &HashMap<String, String>,
    ) -> SsisResult<Vec<TaskLineage>> {
        let doc = self.parse()?;
        let mut entries: Vec<TaskLineage> = Vec::new();

        for executable in enabled_executables(&doc) {
            let executable_type = executable.attribute((DTS_NS, "ExecutableType"));
            let description = executable.attribute((DTS_NS, "Description"));
            let object_name = executable.attribute((DTS_NS, "ObjectName"));

            if description == Some("Analysis Services Processing Task") {
                if let Some(entry) = ssas_entry(&executable, object_name) {
                    push_unique(&mut entries, entry);
                }
                continue;
            }

            if executable_type == Some("Microsoft.ExecuteSQLTask") {
                if let Some(entry) = execute_sql_entry(&executable, object_name, conmgrs) {
                    push_unique(&mut entries, entry);
                }
                continue;
            }

            if description != Some("Sequence Container") {
                if let Some(entry) = data_flow_entry(&executable, naming_overrides) {
                    push_unique(&mut entries, entry);
                }
            }
        }

        Ok(entries)
    }
}

/// Executables not flagged `DTS:Disabled="True"`.
///
/// The package root element is itself a `DTS:Executable`; only its
/// descendants count as tasks.
fn enabled_executables<'a>(doc: &'a Document<'a>) -> Vec<Node<'a, 'a>> {
    let root = doc.root_element();
    doc.descendants()
        .filter(|n| *n != root && n.has_tag_name((DTS_NS, "Executable")))
        .filter(|n| n.attribute((DTS_NS, "Disabled")) != Some("True"))
        .collect()
}

fn push_unique(entries: &mut Vec<TaskLineage>, entry: TaskLineage) {
    if !entries.contains(&entry) {
        entries.push(entry);
    }
}

/// Find a `<property name="...">` value inside a component
fn component_property<'a>(component: &Node<'a, 'a>, name: &str) -> Option<&'a str> {
    component
        .descendants()
        .find(|n| n.has_tag_name("property") && n.attribute("name") == Some(name))
        .and_then(|n| n.text())
}

fn ssas_entry(executable: &Node<'_, '_>, object_name: Option<&str>) -> Option<TaskLineage> {
    let object_data = executable
        .descendants()
        .find(|n| n.has_tag_name((DTS_NS, "ObjectData")))?;

    let mut ssas_target = None;
    let mut connection_name = None;

    for child in object_data.children().filter(Node::is_element) {
        let Some(commands) = child.attribute("ProcessingCommands") else {
            continue;
        };
        match Document::parse(commands) {
            Ok(inner) => {
                ssas_target = inner
                    .descendants()
                    .find(|n| n.has_tag_name((SSAS_ENGINE_NS, "DimensionID")))
                    .and_then(|n| n.text())
                    .or_else(|| {
                        inner
                            .descendants()
                            .find(|n| n.has_tag_name((SSAS_ENGINE_NS, "MeasureGroupID")))
                            .and_then(|n| n.text())
                    })
                    .map(str::to_string);
            }
            Err(e) => warn!("Unparseable ProcessingCommands payload: {e}"),
        }
        connection_name = child.attribute("ConnectionName").map(str::to_string);
    }

    Some(TaskLineage {
        kind: TaskKind::SsasProcessing,
        parent_db: None,
        child_db: connection_name,
        sql_statement: None,
        target_table: ssas_target,
        source_table: None,
        object_name: object_name.map(str::to_string),
    })
}

fn execute_sql_entry(
    executable: &Node<'_, '_>,
    object_name: Option<&str>,
    conmgrs: &ConnectionManagers,
) -> Option<TaskLineage> {
    let task_data = executable
        .descendants()
        .find(|n| n.has_tag_name((SQLTASK_NS, "SqlTaskData")))?;
    let statement = task_data.attribute((SQLTASK_NS, "SqlStatementSource"))?;
    let connection_id = task_data.attribute((SQLTASK_NS, "Connection"));

    let cleaned = SqlCleaner::new(statement).clean().to_lowercase();
    if cleaned.starts_with("truncate table") {
        return None;
    }

    let db = connection_id
        .and_then(|id| conmgrs.get(id))
        .map(str::to_lowercase);

    Some(TaskLineage {
        kind: TaskKind::ExecuteSql,
        parent_db: db.clone(),
        child_db: db,
        sql_statement: Some(cleaned),
        target_table: None,
        source_table: None,
        object_name: object_name.map(str::to_string),
    })
}

fn data_flow_entry(
    executable: &Node<'_, '_>,
    naming_overrides: &HashMap<String, String>,
) -> Option<TaskLineage> {
    let components: Vec<Node<'_, '_>> = executable
        .descendants()
        .filter(|n| n.has_tag_name("component"))
        .collect();
    if components.is_empty() {
        return None;
    }

    let ref_id = executable.attribute((DTS_NS, "refId"));

    let mut source_db = None;
    let mut destination_db = None;
    let mut sql_statement = None;
    let mut source_table = None;
    let mut target_table = None;

    for component in &components {
        let class_id = component.attribute("componentClassID");
        let connection_ref = component
            .descendants()
            .find(|n| n.has_tag_name("connection"))
            .and_then(|n| n.attribute("connectionManagerRefId"));
        let open_rowset = component_property(component, "OpenRowset");
        let access_mode = component_property(component, "AccessMode");

        let Some(conn_ref) = connection_ref else {
            // File-backed components carry no connection manager reference
            match class_id {
                Some("Microsoft.FlatFileSource") => {
                    source_db = Some("file_source".to_string());
                    source_table = Some("file_system_table".to_string());
                }
                Some("Microsoft.FlatFileDestination") => {
                    destination_db = Some("file_destination".to_string());
                    target_table = Some("file_system_table".to_string());
                }
                Some("Microsoft.ExcelSource") => {
                    source_db = Some("excel_source".to_string());
                    source_table = Some("excel_worksheet".to_string());
                }
                _ => {}
            }
            continue;
        };
        if conn_ref.contains("invalid") {
            continue;
        }

        match class_id {
            Some("Microsoft.OLEDBSource") => {
                if access_mode == Some("2") {
                    // AccessMode 2 = SQL command; 0/1/3 are table selections
                    sql_statement = component_property(component, "SqlCommand")
                        .map(|sql| SqlCleaner::new(sql).clean());
                }
                let db = clean_connection_ref(conn_ref);
                if db.contains("package.connectionmanagerslistofservers") {
                    source_table = Some("each_pos_machine".to_string());
                } else {
                    source_table = open_rowset.map(str::to_string);
                }
                source_db = Some(db);
            }
            Some("Microsoft.OLEDBDestination") => {
                target_table = open_rowset.map(str::to_string);
                destination_db = Some(clean_connection_ref(conn_ref));
            }
            Some("Microsoft.FlatFileSource") => {
                source_db = Some("file_source".to_string());
                source_table = Some("file_system_table".to_string());
            }
            Some("Microsoft.FlatFileDestination") => {
                destination_db = Some("file_destination".to_string());
                target_table = Some("file_system_table".to_string());
            }
            Some("Microsoft.ExcelSource") => {
                source_db = Some("excel_source".to_string());
                source_table = Some("excel_worksheet".to_string());
            }
            _ => {}
        }
    }

    let rename = |db: Option<String>| -> Option<String> {
        db.map(|db| naming_overrides.get(&db).cloned().unwrap_or(db))
    };

    let object_name = ref_id.map(|id| {
        // refId looks like "Package\Container\Task"
        id.strip_prefix("Package\\")
            .unwrap_or(id)
            .replace('\\', " -> ")
    });

    Some(TaskLineage {
        kind: TaskKind::DataFlow,
        parent_db: rename(source_db),
        child_db: rename(destination_db),
        sql_statement,
        target_table: target_table.map(|t| SqlCleaner::new(t).remove_brackets().into_sql().to_lowercase()),
        source_table: source_table.map(|t| SqlCleaner::new(t).remove_brackets().into_sql().to_lowercase()),
        object_name,
    })
}

/// Strip the project connection prefix and bracket quoting from a
/// connectionManagerRefId, lowercased.
fn clean_connection_ref(conn_ref: &str) -> String {
    let trimmed = conn_ref.replace(PROJECT_CONNECTION_PREFIX, "");
    SqlCleaner::new(trimmed)
        .remove_brackets()
        .into_sql()
        .to_lowercase()
}

#[cfg(test)]
#[path = "package_test.rs"]
mod tests;
