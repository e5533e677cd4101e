//! Shared command helpers

use anyhow::{Context, Result};
use lm_catalog::JsonCatalog;
use lm_core::{Config, LineageRecord};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::cli::GlobalArgs;

/// Load the project configuration from --config or the project directory
pub fn load_config(global: &GlobalArgs) -> Result<Config> {
    let config = match &global.config {
        Some(path) => Config::load(Path::new(path)),
        None => Config::load_from_dir(Path::new(&global.project_dir)),
    }
    .context("Failed to load lineamap.yml")?;
    Ok(config)
}

/// Snapshot-backed catalog client rooted at the configured snapshot dir
pub fn catalog(global: &GlobalArgs, config: &Config) -> JsonCatalog {
    JsonCatalog::new(config.snapshot_dir_absolute(Path::new(&global.project_dir)))
}

/// Resolve the output path: CLI override first, then config
pub fn output_path(global: &GlobalArgs, config: &Config, output: &Option<String>) -> PathBuf {
    match output {
        Some(path) => PathBuf::from(path),
        None => config.output_path_absolute(Path::new(&global.project_dir)),
    }
}

/// Write records as JSON lines, creating parent directories as needed
pub fn write_records(path: &Path, records: &[LineageRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = std::io::BufWriter::new(file);
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Print a one-line count summary for an extractor
pub fn print_summary(label: &str, records: &[LineageRecord], path: &Path) {
    println!("{}: {} records -> {}", label, records.len(), path.display());
}
