//! The common lineage record shape shared by every extractor

use serde::{Deserialize, Serialize};

/// Which artifact family a record was extracted from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceSystem {
    /// SSIS packages (.dtsx inside .ispac archives)
    Ssis,
    /// Power BI report folders (.pbix contents)
    #[serde(rename = "powerbi")]
    PowerBi,
    /// SSRS report definitions
    Ssrs,
    /// Stored procedure definitions from sys.procedures
    #[serde(rename = "sproc")]
    StoredProcedure,
    /// Views from INFORMATION_SCHEMA.VIEW_TABLE_USAGE
    View,
    /// SQL Agent job steps from msdb
    AgentJob,
}

impl std::fmt::Display for SourceSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceSystem::Ssis => write!(f, "ssis"),
            SourceSystem::PowerBi => write!(f, "powerbi"),
            SourceSystem::Ssrs => write!(f, "ssrs"),
            SourceSystem::StoredProcedure => write!(f, "sproc"),
            SourceSystem::View => write!(f, "view"),
            SourceSystem::AgentJob => write!(f, "agent_job"),
        }
    }
}

/// The kind of database object a record points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectType {
    Table,
    Sp,
    View,
    Cube,
    SharedDataset,
    Package,
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectType::Table => write!(f, "table"),
            ObjectType::Sp => write!(f, "sp"),
            ObjectType::View => write!(f, "view"),
            ObjectType::Cube => write!(f, "cube"),
            ObjectType::SharedDataset => write!(f, "shared_dataset"),
            ObjectType::Package => write!(f, "package"),
        }
    }
}

/// One extracted lineage fact.
///
/// Every extractor produces these; the merge step unions them. Fields that a
/// given artifact cannot provide stay `None`/empty rather than being guessed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineageRecord {
    /// Which extractor produced the record
    pub source_system: SourceSystem,

    /// Database the sources live in
    #[serde(default)]
    pub parent_db: Option<String>,

    /// Schema the sources live in
    #[serde(default)]
    pub parent_schema: Option<String>,

    /// Tables read by the operation
    #[serde(default)]
    pub source_tables: Vec<String>,

    /// Database the targets live in
    #[serde(default)]
    pub child_db: Option<String>,

    /// Tables written by the operation
    #[serde(default)]
    pub target_tables: Vec<String>,

    /// Cleaned SQL text, when the artifact embedded any
    #[serde(default)]
    pub sql_statement: Option<String>,

    /// Kind of object the record describes
    #[serde(default)]
    pub object_type: Option<ObjectType>,

    /// Name of the task, report, procedure, or view the record came from
    #[serde(default)]
    pub object_name: Option<String>,
}

impl LineageRecord {
    /// A record with only the source system set; extractors fill in the rest
    pub fn new(source_system: SourceSystem) -> Self {
        Self {
            source_system,
            parent_db: None,
            parent_schema: None,
            source_tables: Vec::new(),
            child_db: None,
            target_tables: Vec::new(),
            sql_statement: None,
            object_type: None,
            object_name: None,
        }
    }

    /// True when the record carries no table, statement, or object info at all
    pub fn is_empty(&self) -> bool {
        self.source_tables.is_empty()
            && self.target_tables.is_empty()
            && self.sql_statement.is_none()
            && self.object_name.is_none()
    }
}
