//! Stored procedure extraction command

use anyhow::{Context, Result};
use lm_catalog::{queries, CatalogClient};
use lm_core::LineageRecord;

use crate::cli::{CatalogExtractArgs, GlobalArgs};
use crate::commands::common::{catalog, load_config, output_path, print_summary, write_records};

/// Execute the procs command
pub async fn execute(args: &CatalogExtractArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;

    if args.show_query {
        println!(
            "{}",
            queries::procedure_union_query(&config.db_list, &config.exclude_procedures)
        );
        return Ok(());
    }

    let records = extract(global, &config).await?;
    let path = output_path(global, &config, &args.output);
    write_records(&path, &records)?;
    print_summary("procs", &records, &path);
    Ok(())
}

/// Fetch procedure definitions and run the table heuristics over them
pub async fn extract(global: &GlobalArgs, config: &lm_core::Config) -> Result<Vec<LineageRecord>> {
    let rows = catalog(global, config)
        .procedures()
        .await
        .context("Failed to read procedure definitions")?;
    Ok(lm_catalog::extract_procedures(
        &rows,
        &config.reserved_words_set(),
        &config.ddl_keywords,
    ))
}
