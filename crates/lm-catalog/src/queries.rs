//! Catalog query builders
//!
//! Pure string construction: the queries a live deployment runs against
//! SQL Server, the SSIS catalog, and the report server. Executing them is
//! the client's business; building them is unit-testable here.

/// Escape a value for use inside a single-quoted SQL literal
fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn quoted_list(values: &[String]) -> String {
    values
        .iter()
        .map(|v| quote_literal(v))
        .collect::<Vec<_>>()
        .join(", ")
}

/// UNION query over every database's procedures and their definitions
pub fn procedure_union_query(db_list: &[String], exclude_procedures: &[String]) -> String {
    let exclusion = if exclude_procedures.is_empty() {
        String::new()
    } else {
        format!("\nWHERE\n    a.name NOT IN ({})", quoted_list(exclude_procedures))
    };

    db_list
        .iter()
        .map(|db| {
            format!(
                "SELECT\n    {db_literal} AS db,\n    c.name AS schema_name,\n    a.name,\n    b.definition\nFROM\n    {db}.sys.procedures AS a\nJOIN\n    {db}.sys.sql_modules AS b\n    ON a.object_id = b.object_id\nJOIN\n    {db}.sys.schemas AS c\n    ON a.schema_id = c.schema_id{exclusion}",
                db_literal = quote_literal(db),
            )
        })
        .collect::<Vec<_>>()
        .join("\nUNION\n")
}

/// UNION query over every database's view/table usage
pub fn view_usage_union_query(db_list: &[String]) -> String {
    db_list
        .iter()
        .map(|db| {
            format!(
                "SELECT\n    {db_literal} AS child_db,\n    LOWER(view_schema) AS child_schema,\n    LOWER(view_name) AS child_table,\n    LOWER(table_catalog) AS parent_db,\n    LOWER(table_schema) AS parent_schema,\n    LOWER(table_name) AS parent_table\nFROM\n    {db}.INFORMATION_SCHEMA.VIEW_TABLE_USAGE",
                db_literal = quote_literal(db),
            )
        })
        .collect::<Vec<_>>()
        .join("\nUNION\n")
}

/// SQL Agent job steps with the job they belong to
pub fn job_steps_query() -> &'static str {
    "SELECT\n    j.name AS job_name,\n    s.step_name,\n    s.subsystem,\n    s.command,\n    s.database_name\nFROM\n    msdb.dbo.sysjobs AS j\nJOIN\n    msdb.dbo.sysjobsteps AS s\n    ON j.job_id = s.job_id\nWHERE\n    j.enabled = 1"
}

/// Executed packages grouped under their master package, excluding ignored
/// package names
pub fn package_index_query(ignore_packages: &[String]) -> String {
    let base = "SELECT DISTINCT\n    e.folder_name AS project,\n    e.package_name AS master_dtsx,\n    s.package_name\nFROM\n    catalog.executions AS e\nJOIN\n    catalog.executable_statistics AS es\n    ON e.execution_id = es.execution_id\nJOIN\n    catalog.executables AS s\n    ON es.executable_id = s.executable_id";
    if ignore_packages.is_empty() {
        base.to_string()
    } else {
        format!(
            "{base}\nWHERE\n    s.package_name NOT IN ({})",
            quoted_list(ignore_packages)
        )
    }
}

/// Distinct folder/project pairs that have executed from the SSIS catalog
pub fn ssis_project_query() -> &'static str {
    "SELECT DISTINCT\n    folder_name,\n    project_name\nFROM\n    catalog.executions"
}

/// Command that returns a project's deployment archive as binary
pub fn get_project_command(folder_name: &str, project_name: &str) -> String {
    format!(
        "EXEC ssisdb.catalog.get_project {}, {}",
        quote_literal(folder_name),
        quote_literal(project_name)
    )
}

/// Report and shared-dataset definitions from the report server catalog
pub fn report_definition_query() -> &'static str {
    "SELECT\n    c.Name AS name,\n    c.Path AS execute_path,\n    CASE c.Type WHEN 8 THEN 'dataset' ELSE 'report' END AS report_type,\n    CONVERT(NVARCHAR(MAX), CONVERT(VARBINARY(MAX), c.Content)) AS definition\nFROM\n    dbo.Catalog AS c\nWHERE\n    c.Type IN (2, 8)"
}

#[cfg(test)]
#[path = "queries_test.rs"]
mod tests;
