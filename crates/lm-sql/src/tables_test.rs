use super::*;

fn reserved() -> HashSet<String> {
    [
        "ALL", "AND", "AS", "BEGIN", "BY", "CASE", "CROSS", "DELETED", "DISTINCT", "ELSE", "END",
        "EXISTS", "FULL", "GROUP", "IF", "INNER", "INSERTED", "INTO", "JOIN", "LEFT", "NOLOCK",
        "NOT", "NULL", "ON", "OPENQUERY", "OR", "ORDER", "OUTER", "RIGHT", "SELECT", "SET",
        "THEN", "TOP", "UNION", "VALUES", "WHEN", "WHERE", "WITH",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn ddl() -> Vec<String> {
    vec!["update".to_string(), "merge".to_string(), "into".to_string()]
}

#[test]
fn test_simple_select() {
    let lineage = table_lineage("SELECT * FROM edw.dbo.orders", &reserved());
    assert!(lineage.targets.is_empty());
    assert_eq!(
        lineage.sources.iter().collect::<Vec<_>>(),
        vec!["edw.dbo.orders"]
    );
}

#[test]
fn test_join_collects_both_sides() {
    let lineage = table_lineage(
        "SELECT * FROM orders o JOIN customers c ON o.customer_id = c.id",
        &reserved(),
    );
    assert!(lineage.sources.contains("orders"));
    assert!(lineage.sources.contains("customers"));
    assert_eq!(lineage.sources.len(), 2);
}

#[test]
fn test_table_between_two_keywords() {
    // "FROM a JOIN b": the alias pass eats "JOIN" as a's alias candidate,
    // the keyword-only pass still captures b
    let lineage = table_lineage("SELECT * FROM a JOIN b ON a.x = b.x", &reserved());
    assert!(lineage.sources.contains("a"));
    assert!(lineage.sources.contains("b"));
}

#[test]
fn test_insert_into_is_target() {
    let lineage = table_lineage(
        "INSERT INTO edw.dbo.fact_sales SELECT * FROM staging.sales",
        &reserved(),
    );
    assert!(lineage.targets.contains("edw.dbo.fact_sales"));
    assert!(lineage.sources.contains("staging.sales"));
}

#[test]
fn test_update_direct_target() {
    let lineage = table_lineage("UPDATE edw.dbo.orders SET status = 'done'", &reserved());
    assert!(lineage.targets.contains("edw.dbo.orders"));
}

#[test]
fn test_update_via_alias_resolves_next_reference() {
    let sql = "UPDATE o SET o.status = 'done' FROM edw.dbo.orders o WHERE o.id = 1";
    let lineage = table_lineage(sql, &reserved());
    assert!(lineage.targets.contains("edw.dbo.orders"));
}

#[test]
fn test_merge_using_source() {
    let lineage = table_lineage(
        "MERGE edw.dbo.dim_customer USING staging.customer ON 1 = 1",
        &reserved(),
    );
    assert!(lineage.targets.contains("edw.dbo.dim_customer"));
    assert!(lineage.sources.contains("staging.customer"));
}

#[test]
fn test_alias_is_not_a_source() {
    let lineage = table_lineage(
        "SELECT * FROM edw.dbo.orders ord JOIN ord ON 1 = 1",
        &reserved(),
    );
    assert!(!lineage.sources.contains("ord"));
}

#[test]
fn test_cursor_is_not_a_source() {
    let sql = "DECLARE rowscan CURSOR FOR SELECT id FROM edw.dbo.orders \
               OPEN rowscan FETCH NEXT FROM rowscan";
    let lineage = table_lineage(sql, &reserved());
    assert!(lineage.sources.contains("edw.dbo.orders"));
    assert!(!lineage.sources.contains("rowscan"));
}

#[test]
fn test_reserved_word_capture_is_dropped() {
    let lineage = table_lineage("SELECT * FROM deleted", &reserved());
    assert!(lineage.sources.is_empty());
}

#[test]
fn test_empty_script() {
    let lineage = table_lineage("", &reserved());
    assert!(lineage.is_empty());
}

#[test]
fn test_split_statements_by_keyword() {
    let sql = "set nocount on update a set x = 1 ; insert into b select * from c ;";
    let statements = split_statements(sql, &ddl());
    assert!(statements.iter().any(|s| s.starts_with("update a")));
    assert!(statements.iter().any(|s| s.starts_with("into b")));
    assert!(statements.iter().all(|s| !s.contains(';')));
}

#[test]
fn test_split_statements_runs_to_end_without_semicolon() {
    let statements = split_statements("x update a set x = 1", &ddl());
    assert_eq!(statements, vec!["update a set x = 1"]);
}

#[test]
fn test_extract_single_target() {
    let rows = extract_table_lineage(
        "insert into fact_sales select * from staging.sales join dim_date on 1=1",
        &reserved(),
        &ddl(),
    );
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].target.as_deref(), Some("fact_sales"));
    assert!(rows[0].sources.contains("staging.sales"));
    assert!(rows[0].sources.contains("dim_date"));
}

#[test]
fn test_extract_no_target_keeps_sources() {
    let rows = extract_table_lineage("select * from edw.dbo.orders", &reserved(), &ddl());
    assert_eq!(rows.len(), 1);
    assert!(rows[0].target.is_none());
    assert!(rows[0].sources.contains("edw.dbo.orders"));
}

#[test]
fn test_extract_multi_target_scopes_sources_per_statement() {
    let sql = "begin update fact_a set x = 1 from staging.a ; \
               begin update fact_b set x = 1 from staging.b ; end";
    let rows = extract_table_lineage(sql, &reserved(), &ddl());
    assert_eq!(rows.len(), 2);
    let a = rows.iter().find(|r| r.target.as_deref() == Some("fact_a")).unwrap();
    let b = rows.iter().find(|r| r.target.as_deref() == Some("fact_b")).unwrap();
    assert!(a.sources.contains("staging.a"));
    assert!(!a.sources.contains("staging.b"));
    assert!(b.sources.contains("staging.b"));
}
