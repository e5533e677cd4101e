//! Package dependency graph command

use anyhow::Result;
use lm_core::PackageGraph;
use lm_ssis::{PackageLink, SsisExtraction};
use std::collections::BTreeMap;

use crate::cli::{GlobalArgs, GraphArgs, SsisArgs};
use crate::commands::common::load_config;

/// Execute the graph command
pub async fn execute(args: &GraphArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    let ssis_args = SsisArgs {
        output: None,
        unpack: false,
        show_query: false,
    };
    let extraction = crate::commands::ssis::extract(&ssis_args, global, &config).await?;

    for (project, graph) in project_graphs(&extraction) {
        if args
            .project
            .as_deref()
            .is_some_and(|wanted| wanted != project)
        {
            continue;
        }

        println!("{project}");
        if let Some(cycle) = graph.find_cycle() {
            println!("  ! cycle: {cycle}");
        }
        for link in extraction
            .package_links
            .iter()
            .filter(|l| l.project == project)
        {
            println!(
                "  {}",
                graph.dependency_path(project, &link.master, &link.child)
            );
        }

        if args.tasks {
            for link in extraction
                .task_links
                .iter()
                .filter(|l| l.project == project)
            {
                println!("  {}: {} -> {}", link.package, link.from, link.to);
            }
        }
    }

    Ok(())
}

/// One graph per project, built from its execute-package links
pub fn project_graphs(extraction: &SsisExtraction) -> BTreeMap<&str, PackageGraph> {
    let mut graphs: BTreeMap<&str, PackageGraph> = BTreeMap::new();
    for PackageLink {
        project,
        parent,
        child,
        ..
    } in &extraction.package_links
    {
        let graph = graphs.entry(project.as_str()).or_default();
        if let Err(e) = graph.add_link(parent, child) {
            log::warn!("Skipping link {parent} -> {child}: {e}");
        }
    }
    graphs
}
