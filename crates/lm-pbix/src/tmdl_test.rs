use super::*;

const MODEL_TMDL: &str = r#"model Model
	culture: en-US

annotation PBI_QueryOrder = ["dim_date","fact_sales","Errors in fact_sales"]

annotation __PBI_TimeIntelligenceEnabled = 1
"#;

const NAVIGATION_PARTITION: &str = r#"table dim_date
	partition dim_date = m
		mode: import
		source =
				let
				    Source = Sql.Databases("sql01"),
				    EDW = Source{[Name="EDW"]}[Data],
				    dbo_dim_date = EDW{[Schema="dbo",Item="dim_date"]}[Data]
				in
				    dbo_dim_date
"#;

const QUERY_PARTITION: &str = r#"table fact_sales
	partition fact_sales = m
		mode: import
		source =
				let
				    Source = Sql.Database("sql01", "EDW", [Query="SELECT *#(lf)FROM dbo.fact_sales fs#(lf)JOIN reporting.dim_store ds ON fs.store_id = ds.id"])
				in
				    Source
"#;

#[test]
fn test_query_order_excludes_error_tables() {
    let tables = query_order(MODEL_TMDL);
    assert_eq!(tables, vec!["dim_date", "fact_sales"]);
}

#[test]
fn test_query_order_missing_annotation() {
    assert!(query_order("table foo").is_empty());
}

#[test]
fn test_read_tmdl_strips_bom() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.tmdl");
    std::fs::write(&path, "\u{feff}model Model").unwrap();
    assert_eq!(read_tmdl(&path).unwrap(), "model Model");
}

#[test]
fn test_navigation_partition() {
    let sources = partition_sources(NAVIGATION_PARTITION).unwrap();
    assert_eq!(
        sources,
        vec![PartitionSource {
            server: "sql01".to_string(),
            db: "edw".to_string(),
            schema: "dbo".to_string(),
            object: "dim_date".to_string(),
        }]
    );
}

#[test]
fn test_query_partition_extracts_each_table() {
    let sources = partition_sources(QUERY_PARTITION).unwrap();
    assert_eq!(sources.len(), 2);
    assert!(sources.contains(&PartitionSource {
        server: "sql01".to_string(),
        db: "edw".to_string(),
        schema: "dbo".to_string(),
        object: "fact_sales".to_string(),
    }));
    assert!(sources.contains(&PartitionSource {
        server: "sql01".to_string(),
        db: "edw".to_string(),
        schema: "reporting".to_string(),
        object: "dim_store".to_string(),
    }));
}

#[test]
fn test_no_partition_match() {
    assert!(partition_sources("table x\n\tcolumn y").is_none());
}

#[test]
fn test_clean_m_query() {
    assert_eq!(clean_m_query("SELECT *#(lf)FROM t  "), "SELECT *\nFROM t");
}
