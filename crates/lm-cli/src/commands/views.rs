//! View extraction command

use anyhow::{Context, Result};
use lm_catalog::{queries, CatalogClient};
use lm_core::LineageRecord;

use crate::cli::{CatalogExtractArgs, GlobalArgs};
use crate::commands::common::{catalog, load_config, output_path, print_summary, write_records};

/// Execute the views command
pub async fn execute(args: &CatalogExtractArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;

    if args.show_query {
        println!("{}", queries::view_usage_union_query(&config.db_list));
        return Ok(());
    }

    let records = extract(global, &config).await?;
    let path = output_path(global, &config, &args.output);
    write_records(&path, &records)?;
    print_summary("views", &records, &path);
    Ok(())
}

/// Fetch view usage rows and map them to records
pub async fn extract(global: &GlobalArgs, config: &lm_core::Config) -> Result<Vec<LineageRecord>> {
    let rows = catalog(global, config)
        .view_usage()
        .await
        .context("Failed to read view usage")?;
    Ok(lm_catalog::extract_views(&rows))
}
