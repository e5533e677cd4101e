//! SSRS extraction command

use anyhow::{Context, Result};
use lm_catalog::CatalogClient;
use lm_core::LineageRecord;
use lm_ssrs::{extract_reports, ReportDefinition, ReportKind};

use crate::cli::{ExtractArgs, GlobalArgs};
use crate::commands::common::{catalog, load_config, output_path, print_summary, write_records};

/// Execute the ssrs command
pub async fn execute(args: &ExtractArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    let records = extract(global, &config).await?;

    let path = output_path(global, &config, &args.output);
    write_records(&path, &records)?;
    print_summary("ssrs", &records, &path);
    Ok(())
}

/// Fetch report definitions and extract their dataset lineage
pub async fn extract(global: &GlobalArgs, config: &lm_core::Config) -> Result<Vec<LineageRecord>> {
    let rows = catalog(global, config)
        .reports()
        .await
        .context("Failed to read report definitions")?;

    let reports: Vec<ReportDefinition> = rows
        .into_iter()
        .map(|row| ReportDefinition {
            name: row.name,
            path: row.execute_path,
            kind: if row.report_type.eq_ignore_ascii_case("dataset") {
                ReportKind::SharedDataset
            } else {
                ReportKind::Report
            },
            xml: row.definition,
        })
        .collect();

    Ok(extract_reports(&reports, config))
}
