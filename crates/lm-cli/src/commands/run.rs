//! Full extraction run: every extractor, merged, written once

use anyhow::Result;
use chrono::Utc;
use lm_core::{merge_records, SourceSystem};

use crate::cli::{ExtractArgs, GlobalArgs, PbixArgs, SsisArgs};
use crate::commands::common::{load_config, output_path, write_records};
use crate::commands::{jobs, pbix, procs, ssis, ssrs, views};

/// Execute the run command
pub async fn execute(args: &ExtractArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    let started = Utc::now();

    let ssis_args = SsisArgs {
        output: None,
        unpack: false,
        show_query: false,
    };
    let pbix_args = PbixArgs {
        output: None,
        unpack: false,
    };

    let ssis_out = ssis::extract(&ssis_args, global, &config).await?;
    let pbix_records = pbix::extract(&pbix_args, global, &config).await?;
    let ssrs_records = ssrs::extract(global, &config).await?;
    let proc_records = procs::extract(global, &config).await?;
    let view_records = views::extract(global, &config).await?;
    let job_records = jobs::extract(global, &config).await?;

    let merged = merge_records(vec![
        ssis_out.records,
        pbix_records,
        ssrs_records,
        proc_records,
        view_records,
        job_records,
    ]);

    let path = output_path(global, &config, &args.output);
    write_records(&path, &merged)?;

    println!("run finished in {}s", (Utc::now() - started).num_seconds());
    println!("{} records -> {}", merged.len(), path.display());
    for system in [
        SourceSystem::Ssis,
        SourceSystem::PowerBi,
        SourceSystem::Ssrs,
        SourceSystem::StoredProcedure,
        SourceSystem::View,
        SourceSystem::AgentJob,
    ] {
        let count = merged.iter().filter(|r| r.source_system == system).count();
        println!("  {system}: {count}");
    }
    if !ssis_out.errors.is_empty() {
        println!("  ({} ssis packages skipped on errors)", ssis_out.errors.len());
    }

    Ok(())
}
