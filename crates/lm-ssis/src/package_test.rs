use super::*;

const DATA_FLOW_PACKAGE: &str = r#"<?xml version="1.0"?>
<DTS:Executable xmlns:DTS="www.microsoft.com/SqlServer/Dts"
    DTS:ExecutableType="Microsoft.Package" DTS:ObjectName="LoadDim">
  <DTS:Executables>
    <DTS:Executable DTS:refId="Package\Load Customers"
        DTS:ExecutableType="Microsoft.Pipeline"
        DTS:Description="Data Flow Task"
        DTS:ObjectName="Load Customers">
      <DTS:ObjectData>
        <pipeline>
          <components>
            <component refId="Package\Load Customers\Source"
                componentClassID="Microsoft.OLEDBSource">
              <properties>
                <property name="OpenRowset">[staging].[customer]</property>
                <property name="AccessMode">0</property>
              </properties>
              <connections>
                <connection connectionManagerRefId="Project.ConnectionManagers[staging]" />
              </connections>
            </component>
            <component refId="Package\Load Customers\Destination"
                componentClassID="Microsoft.OLEDBDestination">
              <properties>
                <property name="OpenRowset">[dbo].[dim_customer]</property>
              </properties>
              <connections>
                <connection connectionManagerRefId="Project.ConnectionManagers[EDW]" />
              </connections>
            </component>
          </components>
        </pipeline>
      </DTS:ObjectData>
    </DTS:Executable>
  </DTS:Executables>
</DTS:Executable>
"#;

const SQL_TASK_PACKAGE: &str = r#"<?xml version="1.0"?>
<DTS:Executable xmlns:DTS="www.microsoft.com/SqlServer/Dts"
    xmlns:SQLTask="www.microsoft.com/sqlserver/dts/tasks/sqltask"
    DTS:ExecutableType="Microsoft.Package" DTS:ObjectName="Nightly">
  <DTS:Executables>
    <DTS:Executable DTS:refId="Package\Run Load"
        DTS:ExecutableType="Microsoft.ExecuteSQLTask"
        DTS:ObjectName="Run Load">
      <DTS:ObjectData>
        <SQLTask:SqlTaskData
            SQLTask:Connection="{CONN-1}"
            SQLTask:SqlStatementSource="INSERT INTO [dbo].[fact_sales] SELECT * FROM [staging].[sales]" />
      </DTS:ObjectData>
    </DTS:Executable>
    <DTS:Executable DTS:refId="Package\Clear Stage"
        DTS:ExecutableType="Microsoft.ExecuteSQLTask"
        DTS:ObjectName="Clear Stage">
      <DTS:ObjectData>
        <SQLTask:SqlTaskData
            SQLTask:Connection="{CONN-1}"
            SQLTask:SqlStatementSource="TRUNCATE TABLE [staging].[sales]" />
      </DTS:ObjectData>
    </DTS:Executable>
    <DTS:Executable DTS:refId="Package\Disabled Load"
        DTS:ExecutableType="Microsoft.ExecuteSQLTask"
        DTS:Disabled="True"
        DTS:ObjectName="Disabled Load">
      <DTS:ObjectData>
        <SQLTask:SqlTaskData
            SQLTask:Connection="{CONN-1}"
            SQLTask:SqlStatementSource="UPDATE dbo.skipped SET x = 1" />
      </DTS:ObjectData>
    </DTS:Executable>
  </DTS:Executables>
  <DTS:PrecedenceConstraints>
    <DTS:PrecedenceConstraint DTS:From="Package\Run Load" DTS:To="Package\Clear Stage" />
  </DTS:PrecedenceConstraints>
</DTS:Executable>
"#;

const MASTER_PACKAGE: &str = r#"<?xml version="1.0"?>
<DTS:Executable xmlns:DTS="www.microsoft.com/SqlServer/Dts"
    DTS:ExecutableType="Microsoft.Package" DTS:ObjectName="Master">
  <DTS:Executables>
    <DTS:Executable DTS:refId="Package\Run LoadDim"
        DTS:ExecutableType="Microsoft.ExecutePackageTask"
        DTS:ObjectName="Run LoadDim">
      <DTS:ObjectData>
        <ExecutePackageTask>
          <PackageName>LoadDim.dtsx</PackageName>
        </ExecutePackageTask>
      </DTS:ObjectData>
    </DTS:Executable>
    <DTS:Executable DTS:refId="Package\Old Step"
        DTS:ExecutableType="Microsoft.ExecutePackageTask"
        DTS:Disabled="True"
        DTS:ObjectName="Old Step">
      <DTS:ObjectData>
        <ExecutePackageTask>
          <PackageName>Retired.dtsx</PackageName>
        </ExecutePackageTask>
      </DTS:ObjectData>
    </DTS:Executable>
  </DTS:Executables>
</DTS:Executable>
"#;

const SSAS_PACKAGE: &str = r#"<?xml version="1.0"?>
<DTS:Executable xmlns:DTS="www.microsoft.com/SqlServer/Dts"
    DTS:ExecutableType="Microsoft.Package" DTS:ObjectName="CubeRefresh">
  <DTS:Executables>
    <DTS:Executable DTS:refId="Package\Process Sales Cube"
        DTS:ExecutableType="Microsoft.AnalysisServices.Processing"
        DTS:Description="Analysis Services Processing Task"
        DTS:ObjectName="Process Sales Cube">
      <DTS:ObjectData>
        <DDL ConnectionName="SalesCube"
            ProcessingCommands="&lt;Batch xmlns=&quot;http://schemas.microsoft.com/analysisservices/2003/engine&quot;&gt;&lt;Process&gt;&lt;Object&gt;&lt;DimensionID&gt;Dim Customer&lt;/DimensionID&gt;&lt;/Object&gt;&lt;/Process&gt;&lt;/Batch&gt;" />
      </DTS:ObjectData>
    </DTS:Executable>
  </DTS:Executables>
</DTS:Executable>
"#;

fn no_overrides() -> HashMap<String, String> {
    HashMap::new()
}

#[test]
fn test_data_flow_source_and_destination() {
    let pkg = Package::from_xml("LoadDim.dtsx", DATA_FLOW_PACKAGE);
    let entries = pkg
        .task_lineage(&ConnectionManagers::default(), &no_overrides())
        .unwrap();

    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    assert_eq!(entry.kind, TaskKind::DataFlow);
    assert_eq!(entry.parent_db.as_deref(), Some("staging"));
    assert_eq!(entry.child_db.as_deref(), Some("edw"));
    assert_eq!(entry.source_table.as_deref(), Some("staging.customer"));
    assert_eq!(entry.target_table.as_deref(), Some("dbo.dim_customer"));
    assert!(entry.sql_statement.is_none());
    assert_eq!(entry.object_name.as_deref(), Some("Load Customers"));
}

#[test]
fn test_data_flow_naming_override() {
    let pkg = Package::from_xml("LoadDim.dtsx", DATA_FLOW_PACKAGE);
    let mut overrides = HashMap::new();
    overrides.insert("edw".to_string(), "warehouse".to_string());
    let entries = pkg
        .task_lineage(&ConnectionManagers::default(), &overrides)
        .unwrap();
    assert_eq!(entries[0].child_db.as_deref(), Some("warehouse"));
}

#[test]
fn test_execute_sql_task_resolves_connection() {
    let pkg = Package::from_xml("Nightly.dtsx", SQL_TASK_PACKAGE);
    let conmgrs = ConnectionManagers::from_pairs(&[("{CONN-1}", "EDW")]);
    let entries = pkg.task_lineage(&conmgrs, &no_overrides()).unwrap();

    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    assert_eq!(entry.kind, TaskKind::ExecuteSql);
    assert_eq!(entry.parent_db.as_deref(), Some("edw"));
    assert_eq!(entry.child_db.as_deref(), Some("edw"));
    let sql = entry.sql_statement.as_deref().unwrap();
    assert!(sql.contains("insert into dbo.fact_sales"));
    assert_eq!(entry.object_name.as_deref(), Some("Run Load"));
}

#[test]
fn test_truncate_and_disabled_tasks_skipped() {
    let pkg = Package::from_xml("Nightly.dtsx", SQL_TASK_PACKAGE);
    let entries = pkg
        .task_lineage(&ConnectionManagers::default(), &no_overrides())
        .unwrap();
    assert!(entries
        .iter()
        .all(|e| e.object_name.as_deref() == Some("Run Load")));
}

#[test]
fn test_precedence_links() {
    let pkg = Package::from_xml("Nightly.dtsx", SQL_TASK_PACKAGE);
    let links = pkg.precedence_links().unwrap();
    assert_eq!(
        links,
        vec![PrecedenceLink {
            from: "Package\\Run Load".to_string(),
            to: "Package\\Clear Stage".to_string(),
        }]
    );
}

#[test]
fn test_execute_package_links_skip_disabled() {
    let pkg = Package::from_xml("Master.dtsx", MASTER_PACKAGE);
    let calls = pkg.execute_package_links().unwrap();
    assert_eq!(
        calls,
        vec![PackageCall {
            task_name: "Run LoadDim".to_string(),
            child_package: "LoadDim.dtsx".to_string(),
        }]
    );
}

#[test]
fn test_ssas_processing_task() {
    let pkg = Package::from_xml("CubeRefresh.dtsx", SSAS_PACKAGE);
    let entries = pkg
        .task_lineage(&ConnectionManagers::default(), &no_overrides())
        .unwrap();

    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    assert_eq!(entry.kind, TaskKind::SsasProcessing);
    assert_eq!(entry.child_db.as_deref(), Some("SalesCube"));
    assert_eq!(entry.target_table.as_deref(), Some("Dim Customer"));
    assert!(entry.parent_db.is_none());
}

#[test]
fn test_load_missing_package() {
    let err = Package::load(std::path::Path::new("/nonexistent/p.dtsx")).unwrap_err();
    assert!(matches!(err, SsisError::PackageNotFound { .. }));
}

#[test]
fn test_malformed_xml_reports_package_name() {
    let pkg = Package::from_xml("Broken.dtsx", "<DTS:Executable");
    let err = pkg.precedence_links().unwrap_err();
    match err {
        SsisError::XmlParse { path, .. } => assert_eq!(path, "Broken.dtsx"),
        other => panic!("unexpected error: {other}"),
    }
}
