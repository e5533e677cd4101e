//! SQL Agent job step lineage
//!
//! TSQL steps either call stored procedures (EXEC somewhere in the command)
//! or run inline DML; other subsystems (SSIS, CmdExec, PowerShell) carry no
//! SQL text worth mining.

use crate::rows::JobStepRow;
use lm_core::{LineageRecord, ObjectType, SourceSystem};
use lm_sql::{clean_sql, extract_proc_names, split_proc_name, table_lineage};
use std::collections::HashSet;

const TSQL_SUBSYSTEM: &str = "TSQL";

/// Extract lineage records from job steps
pub fn extract_job_steps(rows: &[JobStepRow], db_set: &HashSet<String>, reserved: &HashSet<String>) -> Vec<LineageRecord> {
    let mut records = Vec::new();

    for row in rows {
        if !row.subsystem.eq_ignore_ascii_case(TSQL_SUBSYSTEM) {
            continue;
        }
        let step_label = format!("{} :: {}", row.job_name, row.step_name);
        let cleaned = clean_sql(&row.command).to_lowercase();
        let step_db = row.database_name.as_deref().map(str::to_lowercase);

        if row.command.to_uppercase().contains("EXEC") {
            for proc_name in extract_proc_names(&cleaned) {
                let parts = split_proc_name(&proc_name, step_db.as_deref(), db_set);
                let mut record = LineageRecord::new(SourceSystem::AgentJob);
                record.parent_db = parts.db;
                record.parent_schema = Some(parts.schema);
                record.source_tables = parts.name.into_iter().collect();
                record.object_type = Some(ObjectType::Sp);
                record.object_name = Some(step_label.clone());
                records.push(record);
            }
        } else {
            let lineage = table_lineage(&cleaned, reserved);
            if lineage.is_empty() {
                continue;
            }
            let mut record = LineageRecord::new(SourceSystem::AgentJob);
            record.parent_db = step_db.clone();
            record.child_db = step_db;
            record.source_tables = lineage.sources.into_iter().collect();
            record.target_tables = lineage.targets.into_iter().collect();
            record.sql_statement = Some(cleaned);
            record.object_type = Some(ObjectType::Table);
            record.object_name = Some(step_label);
            records.push(record);
        }
    }

    records
}
