//! SSIS extraction command

use anyhow::{Context, Result};
use lm_catalog::CatalogClient;
use lm_ssis::{extract_index, ConnectionManagers, PackageIndex, PackageIndexEntry};
use std::path::Path;

use crate::cli::{GlobalArgs, SsisArgs};
use crate::commands::common::{catalog, load_config, output_path, print_summary, write_records};

/// Execute the ssis command
pub async fn execute(args: &SsisArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;

    if args.show_query {
        println!("{}", lm_catalog::queries::package_index_query(&config.ignore_packages));
        return Ok(());
    }

    let extraction = extract(args, global, &config).await?;

    if global.verbose {
        for (item, message) in &extraction.errors {
            eprintln!("[verbose] skipped {item}: {message}");
        }
    }

    let path = output_path(global, &config, &args.output);
    write_records(&path, &extraction.records)?;
    print_summary("ssis", &extraction.records, &path);
    if !extraction.errors.is_empty() {
        println!("  ({} packages skipped on errors)", extraction.errors.len());
    }
    Ok(())
}

/// Unpack (optionally), index, and walk the SSIS export
pub async fn extract(
    args: &SsisArgs,
    global: &GlobalArgs,
    config: &lm_core::Config,
) -> Result<lm_ssis::SsisExtraction> {
    let ssis_dir = config.ssis_dir_absolute(Path::new(&global.project_dir));

    if args.unpack {
        let unpacked = lm_ssis::unpack_all(&ssis_dir, config.threads)
            .await
            .context("ISPAC unpack failed")?;
        println!("unpacked {unpacked} project folders");
    }

    let index_rows = catalog(global, config)
        .package_index()
        .await
        .context("Failed to read package index")?;
    let entries = index_rows
        .into_iter()
        .map(|row| PackageIndexEntry {
            project: row.project,
            master: row.master_dtsx,
            package: row.package_name,
        })
        .collect();
    let index = PackageIndex::new(&ssis_dir, entries);

    let conmgrs = ConnectionManagers::load_dir(&ssis_dir).context("Connection manager scan failed")?;
    if global.verbose {
        eprintln!("[verbose] {} connection managers", conmgrs.len());
    }

    Ok(extract_index(
        &index,
        &conmgrs,
        &config.naming_overrides,
        &config.reserved_words_set(),
    ))
}
