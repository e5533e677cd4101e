//! Typed catalog row shapes
//!
//! Whatever executes the catalog queries (live connection or snapshot file)
//! hands rows back in these shapes.

use serde::{Deserialize, Serialize};

/// One stored procedure with its definition text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcedureRow {
    pub db: String,
    pub schema_name: String,
    pub name: String,
    pub definition: String,
}

/// One row of INFORMATION_SCHEMA.VIEW_TABLE_USAGE
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewUsageRow {
    pub child_db: String,
    pub child_schema: String,
    pub child_table: String,
    pub parent_db: String,
    pub parent_schema: String,
    pub parent_table: String,
}

/// One SQL Agent job step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStepRow {
    pub job_name: String,
    pub step_name: String,
    pub subsystem: String,
    pub command: String,
    /// Database the step runs in
    #[serde(default)]
    pub database_name: Option<String>,
}

/// One package execution row from the SSIS catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageIndexRow {
    pub project: String,
    pub master_dtsx: String,
    pub package_name: String,
}

/// One report (or shared dataset) definition from the report server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRow {
    pub name: String,
    pub execute_path: String,
    /// "report" or "dataset"
    pub report_type: String,
    pub definition: String,
}
