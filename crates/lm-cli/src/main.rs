//! lineamap CLI - BI artifact lineage extraction

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::Cli;
use commands::{graph, jobs, pbix, procs, run, ssis, ssrs, views};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match &cli.command {
        cli::Commands::Ssis(args) => ssis::execute(args, &cli.global).await,
        cli::Commands::Pbix(args) => pbix::execute(args, &cli.global).await,
        cli::Commands::Ssrs(args) => ssrs::execute(args, &cli.global).await,
        cli::Commands::Procs(args) => procs::execute(args, &cli.global).await,
        cli::Commands::Views(args) => views::execute(args, &cli.global).await,
        cli::Commands::Jobs(args) => jobs::execute(args, &cli.global).await,
        cli::Commands::Graph(args) => graph::execute(args, &cli.global).await,
        cli::Commands::Run(args) => run::execute(args, &cli.global).await,
    }
}
