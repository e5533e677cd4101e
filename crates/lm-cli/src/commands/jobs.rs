//! SQL Agent job extraction command

use anyhow::{Context, Result};
use lm_catalog::{queries, CatalogClient};
use lm_core::LineageRecord;

use crate::cli::{CatalogExtractArgs, GlobalArgs};
use crate::commands::common::{catalog, load_config, output_path, print_summary, write_records};

/// Execute the jobs command
pub async fn execute(args: &CatalogExtractArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;

    if args.show_query {
        println!("{}", queries::job_steps_query());
        return Ok(());
    }

    let records = extract(global, &config).await?;
    let path = output_path(global, &config, &args.output);
    write_records(&path, &records)?;
    print_summary("jobs", &records, &path);
    Ok(())
}

/// Fetch job steps and mine their TSQL commands
pub async fn extract(global: &GlobalArgs, config: &lm_core::Config) -> Result<Vec<LineageRecord>> {
    let rows = catalog(global, config)
        .job_steps()
        .await
        .context("Failed to read job steps")?;
    Ok(lm_catalog::extract_job_steps(
        &rows,
        &config.db_set(),
        &config.reserved_words_set(),
    ))
}
