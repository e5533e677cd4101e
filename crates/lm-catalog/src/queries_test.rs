use super::*;

fn dbs() -> Vec<String> {
    vec!["edw".to_string(), "edw_customer".to_string()]
}

#[test]
fn test_procedure_union_query_covers_each_db() {
    let query = procedure_union_query(&dbs(), &["sp_helpdiagrams".to_string()]);
    assert!(query.contains("edw.sys.procedures"));
    assert!(query.contains("edw_customer.sys.procedures"));
    assert_eq!(query.matches("UNION").count(), 1);
    assert!(query.contains("a.name NOT IN ('sp_helpdiagrams')"));
}

#[test]
fn test_procedure_union_query_no_exclusions() {
    let query = procedure_union_query(&dbs(), &[]);
    assert!(!query.contains("NOT IN"));
}

#[test]
fn test_view_usage_union_query() {
    let query = view_usage_union_query(&dbs());
    assert!(query.contains("edw.INFORMATION_SCHEMA.VIEW_TABLE_USAGE"));
    assert!(query.contains("'edw_customer' AS child_db"));
    assert_eq!(query.matches("UNION").count(), 1);
}

#[test]
fn test_package_index_query_ignores() {
    let query = package_index_query(&["Archive.dtsx".to_string()]);
    assert!(query.contains("NOT IN ('Archive.dtsx')"));
    let query = package_index_query(&[]);
    assert!(!query.contains("NOT IN"));
}

#[test]
fn test_get_project_command_escapes_quotes() {
    let command = get_project_command("O'Brien", "Sales");
    assert_eq!(command, "EXEC ssisdb.catalog.get_project 'O''Brien', 'Sales'");
}

#[test]
fn test_static_queries_name_expected_catalogs() {
    assert!(job_steps_query().contains("msdb.dbo.sysjobsteps"));
    assert!(ssis_project_query().contains("catalog.executions"));
    assert!(report_definition_query().contains("dbo.Catalog"));
}
