//! View lineage
//!
//! INFORMATION_SCHEMA.VIEW_TABLE_USAGE already states which tables each view
//! reads; rows map one-to-one onto records.

use crate::rows::ViewUsageRow;
use lm_core::{LineageRecord, ObjectType, SourceSystem};

/// Map view usage rows onto lineage records
pub fn extract_views(rows: &[ViewUsageRow]) -> Vec<LineageRecord> {
    rows.iter()
        .map(|row| {
            let mut record = LineageRecord::new(SourceSystem::View);
            record.parent_db = Some(row.parent_db.to_lowercase());
            record.parent_schema = Some(row.parent_schema.to_lowercase());
            record.source_tables = vec![row.parent_table.to_lowercase()];
            record.child_db = Some(row.child_db.to_lowercase());
            record.target_tables = vec![format!(
                "{}.{}",
                row.child_schema.to_lowercase(),
                row.child_table.to_lowercase()
            )];
            record.object_type = Some(ObjectType::View);
            record.object_name = Some(row.child_table.to_lowercase());
            record
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_rows_map_directly() {
        let rows = [ViewUsageRow {
            child_db: "EDW".to_string(),
            child_schema: "reporting".to_string(),
            child_table: "v_sales".to_string(),
            parent_db: "EDW".to_string(),
            parent_schema: "dbo".to_string(),
            parent_table: "fact_sales".to_string(),
        }];
        let records = extract_views(&rows);

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.source_system, SourceSystem::View);
        assert_eq!(record.parent_db.as_deref(), Some("edw"));
        assert_eq!(record.source_tables, vec!["fact_sales"]);
        assert_eq!(record.target_tables, vec!["reporting.v_sales"]);
        assert_eq!(record.object_type, Some(ObjectType::View));
    }
}
