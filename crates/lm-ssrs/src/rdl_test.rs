use super::*;

const REPORT_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Report xmlns="http://schemas.microsoft.com/sqlserver/reporting/2016/01/reportdefinition">
  <DataSources>
    <DataSource Name="Warehouse">
      <ConnectionProperties>
        <ConnectString>Data Source=sql01;Initial Catalog="EDW"</ConnectString>
      </ConnectionProperties>
    </DataSource>
    <DataSource Name="SharedSource">
      <DataSourceReference>/Data Sources/EDW_GL</DataSourceReference>
    </DataSource>
  </DataSources>
  <DataSets>
    <DataSet Name="SalesByDay">
      <Query>
        <DataSourceName>Warehouse</DataSourceName>
        <CommandText>SELECT * FROM [dbo].[fact_sales] -- daily grain</CommandText>
      </Query>
    </DataSet>
    <DataSet Name="MonthlyClose">
      <Query>
        <DataSourceName>Warehouse</DataSourceName>
        <CommandType>StoredProcedure</CommandType>
        <CommandText>finance.usp_monthly_close</CommandText>
      </Query>
    </DataSet>
    <DataSet Name="CubeSlice">
      <Query>
        <DataSourceName>SharedSource</DataSourceName>
        <CommandText>SELECT NON EMPTY { [Measures].[Amount] } ON COLUMNS FROM [Sales]</CommandText>
      </Query>
    </DataSet>
    <DataSet Name="SharedOrders">
      <SharedDataSet>
        <SharedDataSetReference>/Shared Datasets/Orders</SharedDataSetReference>
      </SharedDataSet>
    </DataSet>
  </DataSets>
</Report>
"#;

const SHARED_DATASET_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<SharedDataSet xmlns="http://schemas.microsoft.com/sqlserver/reporting/2010/01/shareddatasetdefinition">
  <DataSet Name="Orders">
    <Query>
      <DataSourceReference>/Data Sources/EDW</DataSourceReference>
      <CommandText>SELECT * FROM dbo.orders</CommandText>
    </Query>
  </DataSet>
</SharedDataSet>
"#;

#[test]
fn test_extract_server_db() {
    let info = extract_server_db("Data Source=sql01;Initial Catalog=\"EDW\"");
    assert_eq!(info.server.as_deref(), Some("sql01"));
    assert_eq!(info.database.as_deref(), Some("EDW"));
}

#[test]
fn test_extract_server_db_unquoted() {
    let info = extract_server_db("Data Source=sql01;Initial Catalog=EDW;Integrated Security=true");
    assert_eq!(info.database.as_deref(), Some("EDW"));
}

#[test]
fn test_parse_report_datasets() {
    let datasets = parse_datasets("sales", REPORT_XML, ReportKind::Report, "sql01").unwrap();
    assert_eq!(datasets.len(), 4);

    let sales = datasets.iter().find(|d| d.name == "SalesByDay").unwrap();
    assert_eq!(sales.command_kind, CommandKind::Sql);
    assert_eq!(sales.server, "sql01");
    assert_eq!(sales.db.as_deref(), Some("edw"));
    assert!(sales.sql.contains("from dbo.fact_sales"));
    assert!(!sales.sql.contains("daily grain"));

    let close = datasets.iter().find(|d| d.name == "MonthlyClose").unwrap();
    assert_eq!(close.command_kind, CommandKind::Sp);
    assert_eq!(close.sql, "finance.usp_monthly_close");

    let cube = datasets.iter().find(|d| d.name == "CubeSlice").unwrap();
    assert_eq!(cube.command_kind, CommandKind::Ssas);
    assert_eq!(cube.db.as_deref(), Some("edw_gl"));

    let shared = datasets.iter().find(|d| d.name == "SharedOrders").unwrap();
    assert_eq!(
        shared.shared_data_set.as_deref(),
        Some("Shared Datasets -> Orders")
    );
}

#[test]
fn test_parse_shared_dataset_definition() {
    let datasets = parse_datasets(
        "orders",
        SHARED_DATASET_XML,
        ReportKind::SharedDataset,
        "sql01",
    )
    .unwrap();
    assert_eq!(datasets.len(), 1);
    let ds = &datasets[0];
    assert_eq!(ds.db.as_deref(), Some("edw"));
    // No data source map for shared dataset files; server falls back
    assert_eq!(ds.server, "sql01");
}

#[test]
fn test_parse_bad_xml() {
    assert!(parse_datasets("broken", "<Report", ReportKind::Report, "s").is_err());
}

#[test]
fn test_exec_command_text_is_sp() {
    let xml = r#"<Report xmlns="http://example/rd">
      <DataSets>
        <DataSet Name="d1">
          <Query><CommandText>EXEC dbo.usp_report</CommandText></Query>
        </DataSet>
      </DataSets>
    </Report>"#;
    let datasets = parse_datasets("r", xml, ReportKind::Report, "sql01").unwrap();
    assert_eq!(datasets[0].command_kind, CommandKind::Sp);
    assert_eq!(datasets[0].sql, "exec dbo.usp_report");
}
