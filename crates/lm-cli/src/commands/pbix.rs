//! Power BI extraction command

use anyhow::{Context, Result};
use lm_core::LineageRecord;
use std::path::Path;

use crate::cli::{GlobalArgs, PbixArgs};
use crate::commands::common::{load_config, output_path, print_summary, write_records};

/// Execute the pbix command
pub async fn execute(args: &PbixArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    let records = extract(args, global, &config).await?;

    let path = output_path(global, &config, &args.output);
    write_records(&path, &records)?;
    print_summary("pbix", &records, &path);
    Ok(())
}

/// Unpack (optionally) and scan the Power BI export
pub async fn extract(
    args: &PbixArgs,
    global: &GlobalArgs,
    config: &lm_core::Config,
) -> Result<Vec<LineageRecord>> {
    let pbix_dir = config.pbix_dir_absolute(Path::new(&global.project_dir));

    if args.unpack {
        let folders = lm_pbix::unpack_all(&pbix_dir, config.threads)
            .await
            .context("PBIX unpack failed")?;
        println!("extracted {} report archives", folders.len());
    }

    let rows = lm_pbix::scan_reports(&pbix_dir, &config.reserved_words_set())
        .context("Report folder scan failed")?;
    Ok(lm_pbix::to_records(rows))
}
