//! Configuration types and parsing for lineamap.yml

use crate::error::{CoreError, CoreResult};
use crate::object_ref::NameDefaults;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Main project configuration from lineamap.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name
    pub name: String,

    /// Server assumed for references that don't name one
    #[serde(default = "default_server")]
    pub default_server: String,

    /// Databases whose objects should be scanned for procedures and views
    #[serde(default)]
    pub db_list: Vec<String>,

    /// Databases hosted somewhere other than `default_server`
    /// (key: database name, value: its server)
    #[serde(default)]
    pub server_overrides: HashMap<String, String>,

    /// SSIS connection names remapped to real database names
    #[serde(default)]
    pub naming_overrides: HashMap<String, String>,

    /// Words that look like table names in the capture position but aren't
    #[serde(default = "default_reserved_words")]
    pub sql_reserved_words: Vec<String>,

    /// Keywords that open a writing statement, used to split scripts
    #[serde(default = "default_ddl_keywords")]
    pub ddl_keywords: Vec<String>,

    /// SSIS packages excluded from the walk
    #[serde(default)]
    pub ignore_packages: Vec<String>,

    /// Stored procedures excluded from the catalog scan
    #[serde(default)]
    pub exclude_procedures: Vec<String>,

    /// Report folder path prefixes to skip entirely
    #[serde(default = "default_path_exclusions")]
    pub path_exclusions: Vec<String>,

    /// Directory holding exported SSIS projects (.ispac per project folder)
    #[serde(default = "default_ssis_dir")]
    pub ssis_dir: String,

    /// Directory holding exported Power BI reports
    #[serde(default = "default_pbix_dir")]
    pub pbix_dir: String,

    /// Directory holding catalog snapshot JSON files
    #[serde(default = "default_snapshot_dir")]
    pub snapshot_dir: String,

    /// Where the merged record stream is written
    #[serde(default = "default_output_path")]
    pub output_path: String,

    /// Database backing the report server catalog (owns shared datasets)
    #[serde(default = "default_report_server_db")]
    pub report_server_db: String,

    /// Concurrent archive extractions
    #[serde(default = "default_threads")]
    pub threads: usize,
}

fn default_server() -> String {
    "localhost".to_string()
}

fn default_ssis_dir() -> String {
    "ssis_export".to_string()
}

fn default_pbix_dir() -> String {
    "pbix_export".to_string()
}

fn default_snapshot_dir() -> String {
    "snapshots".to_string()
}

fn default_output_path() -> String {
    "target/lineage.jsonl".to_string()
}

fn default_report_server_db() -> String {
    "reportserver".to_string()
}

fn default_threads() -> usize {
    5
}

fn default_path_exclusions() -> Vec<String> {
    vec!["BI WIP".to_string(), "Z Archive".to_string()]
}

fn default_ddl_keywords() -> Vec<String> {
    ["update", "merge", "into"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_reserved_words() -> Vec<String> {
    [
        "ALL", "AND", "AS", "BEGIN", "BY", "CASE", "CROSS", "DELETED", "DISTINCT", "ELSE", "END",
        "EXISTS", "FULL", "GROUP", "IF", "INNER", "INSERTED", "INTO", "JOIN", "LEFT", "NOLOCK",
        "NOT", "NULL", "ON", "OPENQUERY", "OR", "ORDER", "OUTER", "RIGHT", "SELECT", "SET",
        "THEN", "TOP", "UNION", "VALUES", "WHEN", "WHERE", "WITH",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for lineamap.yml or lineamap.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let yml_path = dir.join("lineamap.yml");
        let yaml_path = dir.join("lineamap.yaml");

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            Err(CoreError::ConfigNotFound {
                path: yml_path.display().to_string(),
            })
        }
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.name.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "Project name cannot be empty".to_string(),
            });
        }

        if self.threads == 0 {
            return Err(CoreError::ConfigInvalid {
                message: "threads must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    /// Reserved words as an uppercase set for O(1) membership checks
    pub fn reserved_words_set(&self) -> HashSet<String> {
        self.sql_reserved_words
            .iter()
            .map(|w| w.to_uppercase())
            .collect()
    }

    /// Databases as a lowercase set
    pub fn db_set(&self) -> HashSet<String> {
        self.db_list.iter().map(|d| d.to_lowercase()).collect()
    }

    /// Name-completion defaults derived from the server settings
    pub fn name_defaults(&self) -> NameDefaults {
        NameDefaults {
            server: self.default_server.clone(),
            server_overrides: self.server_overrides.clone(),
        }
    }

    /// Absolute SSIS export directory relative to a project root
    pub fn ssis_dir_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.ssis_dir)
    }

    /// Absolute Power BI export directory relative to a project root
    pub fn pbix_dir_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.pbix_dir)
    }

    /// Absolute catalog snapshot directory relative to a project root
    pub fn snapshot_dir_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.snapshot_dir)
    }

    /// Absolute output path relative to a project root
    pub fn output_path_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.output_path)
    }

    /// True when a report folder path falls under an excluded prefix
    pub fn is_excluded_path(&self, path: &str) -> bool {
        self.path_exclusions.iter().any(|p| path.starts_with(p))
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
