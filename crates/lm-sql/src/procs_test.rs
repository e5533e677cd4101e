use super::*;

fn dbs() -> HashSet<String> {
    ["edw", "edw_customer", "staging"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[test]
fn test_extract_exec_reference() {
    let names = extract_proc_names("EXEC dbo.usp_load_sales @day = '2024-01-01'");
    assert_eq!(names, vec!["dbo.usp_load_sales"]);
}

#[test]
fn test_extract_execute_with_return_assignment() {
    let names = extract_proc_names("EXECUTE @rc = edw.dbo.usp_refresh");
    assert_eq!(names, vec!["edw.dbo.usp_refresh"]);
}

#[test]
fn test_extract_create_procedure() {
    let names = extract_proc_names("CREATE PROCEDURE [dbo].[usp_build_dim] AS BEGIN SELECT 1 END");
    assert_eq!(names, vec!["dbo.usp_build_dim"]);
}

#[test]
fn test_extract_dedupes_preserving_order() {
    let sql = "EXEC dbo.usp_a; EXEC dbo.usp_b; EXEC dbo.usp_a;";
    assert_eq!(extract_proc_names(sql), vec!["dbo.usp_a", "dbo.usp_b"]);
}

#[test]
fn test_extract_none() {
    assert!(extract_proc_names("SELECT 1").is_empty());
}

#[test]
fn test_exec_target_schema_qualified() {
    let target = exec_target("exec finance.usp_close_month", &dbs()).unwrap();
    assert_eq!(target.schema, "finance");
    assert_eq!(target.name, "usp_close_month");
}

#[test]
fn test_exec_target_db_qualified_falls_back_to_dbo() {
    let target = exec_target("exec edw.usp_load", &dbs()).unwrap();
    assert_eq!(target.schema, "dbo");
    assert_eq!(target.name, "usp_load");
}

#[test]
fn test_exec_target_three_parts() {
    let target = exec_target("EXECUTE edw.audit.usp_log_run", &dbs()).unwrap();
    assert_eq!(target.schema, "audit");
    assert_eq!(target.name, "usp_log_run");
}

#[test]
fn test_exec_target_bare_name() {
    let target = exec_target("EXEC usp_refresh @full = 1", &dbs()).unwrap();
    assert_eq!(target.schema, "dbo");
    assert_eq!(target.name, "usp_refresh");
}

#[test]
fn test_exec_target_missing() {
    assert!(exec_target("SELECT * FROM t", &dbs()).is_none());
}

#[test]
fn test_split_three_part_name() {
    let parts = split_proc_name("edw.audit.usp_log", Some("msdb"), &dbs());
    assert_eq!(parts.db.as_deref(), Some("edw"));
    assert_eq!(parts.schema, "audit");
    assert_eq!(parts.name.as_deref(), Some("usp_log"));
}

#[test]
fn test_split_two_parts_head_is_step_db() {
    let parts = split_proc_name("edw.usp_load", Some("edw"), &dbs());
    assert_eq!(parts.db.as_deref(), Some("edw"));
    assert_eq!(parts.schema, "dbo");
    assert_eq!(parts.name.as_deref(), Some("usp_load"));
}

#[test]
fn test_split_two_parts_head_is_schema() {
    let parts = split_proc_name("finance.usp_close", Some("edw"), &dbs());
    assert_eq!(parts.db.as_deref(), Some("edw"));
    assert_eq!(parts.schema, "finance");
    assert_eq!(parts.name.as_deref(), Some("usp_close"));
}

#[test]
fn test_split_two_parts_head_is_other_known_db() {
    let parts = split_proc_name("staging.loader", Some("edw"), &dbs());
    assert_eq!(parts.db.as_deref(), Some("staging"));
    assert_eq!(parts.schema, "loader");
    assert!(parts.name.is_none());
}

#[test]
fn test_split_bare_name() {
    let parts = split_proc_name("usp_cleanup", Some("edw"), &dbs());
    assert_eq!(parts.db.as_deref(), Some("edw"));
    assert_eq!(parts.schema, "dbo");
    assert_eq!(parts.name.as_deref(), Some("usp_cleanup"));
}
