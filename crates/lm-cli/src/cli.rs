//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand};

/// lineamap - extract data lineage from BI artifacts
#[derive(Parser, Debug)]
#[command(name = "lm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract lineage from SSIS packages
    Ssis(SsisArgs),

    /// Extract lineage from Power BI report folders
    Pbix(PbixArgs),

    /// Extract lineage from SSRS report definitions
    Ssrs(ExtractArgs),

    /// Extract lineage from stored procedure definitions
    Procs(CatalogExtractArgs),

    /// Extract lineage from view/table usage
    Views(CatalogExtractArgs),

    /// Extract lineage from SQL Agent job steps
    Jobs(CatalogExtractArgs),

    /// Print the cross-package dependency graph
    Graph(GraphArgs),

    /// Run every extractor and write the merged record stream
    Run(ExtractArgs),
}

/// Arguments shared by the plain extract commands
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Override the output path from the config
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Arguments for catalog-driven extract commands
#[derive(Args, Debug)]
pub struct CatalogExtractArgs {
    /// Override the output path from the config
    #[arg(short, long)]
    pub output: Option<String>,

    /// Print the catalog query instead of extracting
    #[arg(long)]
    pub show_query: bool,
}

/// Arguments for the ssis command
#[derive(Args, Debug)]
pub struct SsisArgs {
    /// Override the output path from the config
    #[arg(short, long)]
    pub output: Option<String>,

    /// Unpack .ispac archives before extraction
    #[arg(long)]
    pub unpack: bool,

    /// Print the package index query instead of extracting
    #[arg(long)]
    pub show_query: bool,
}

/// Arguments for the pbix command
#[derive(Args, Debug)]
pub struct PbixArgs {
    /// Override the output path from the config
    #[arg(short, long)]
    pub output: Option<String>,

    /// Unpack .pbix archives before extraction
    #[arg(long)]
    pub unpack: bool,
}

/// Arguments for the graph command
#[derive(Args, Debug)]
pub struct GraphArgs {
    /// Limit to one project
    #[arg(long)]
    pub project: Option<String>,

    /// Also print task-level precedence edges within each package
    #[arg(long)]
    pub tasks: bool,
}
