//! Stored procedure lineage
//!
//! Each procedure definition is cleaned and run through the table
//! heuristics; a procedure that writes several tables yields one record per
//! target with the sources scoped to it.

use crate::rows::ProcedureRow;
use lm_core::{strip_db_prefix, LineageRecord, ObjectType, SourceSystem};
use lm_sql::{clean_sql, extract_table_lineage};
use std::collections::HashSet;

/// Extract lineage records from procedure definitions
pub fn extract_procedures(
    rows: &[ProcedureRow],
    reserved: &HashSet<String>,
    ddl_keywords: &[String],
) -> Vec<LineageRecord> {
    let mut records = Vec::new();

    for row in rows {
        let cleaned = clean_sql(&row.definition).to_lowercase();
        if cleaned.is_empty() {
            continue;
        }

        for lineage in extract_table_lineage(&cleaned, reserved, ddl_keywords) {
            let sources = strip_db_prefix(
                &row.db.to_lowercase(),
                &row.schema_name.to_lowercase(),
                lineage.sources.into_iter().collect(),
            );

            let mut record = LineageRecord::new(SourceSystem::StoredProcedure);
            record.parent_db = Some(row.db.to_lowercase());
            record.parent_schema = Some(row.schema_name.to_lowercase());
            record.child_db = Some(row.db.to_lowercase());
            record.source_tables = sources;
            record.target_tables = lineage.target.into_iter().collect();
            record.sql_statement = Some(cleaned.clone());
            record.object_type = Some(ObjectType::Sp);
            record.object_name = Some(format!(
                "{}.{}",
                row.schema_name.to_lowercase(),
                row.name.to_lowercase()
            ));
            records.push(record);
        }
    }

    records
}
