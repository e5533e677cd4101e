//! Catalog access seam
//!
//! Live SQL Server connectivity stays outside this repository; anything that
//! can produce the typed rows implements `CatalogClient`. The bundled
//! implementation reads JSON snapshot files exported from the real catalogs,
//! which also makes every extractor runnable offline.

use crate::error::{CatalogError, CatalogResult};
use crate::rows::{JobStepRow, PackageIndexRow, ProcedureRow, ReportRow, ViewUsageRow};
use async_trait::async_trait;
use log::info;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Source of catalog rows for the catalog-driven extractors
#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn procedures(&self) -> CatalogResult<Vec<ProcedureRow>>;
    async fn view_usage(&self) -> CatalogResult<Vec<ViewUsageRow>>;
    async fn job_steps(&self) -> CatalogResult<Vec<JobStepRow>>;
    async fn package_index(&self) -> CatalogResult<Vec<PackageIndexRow>>;
    async fn reports(&self) -> CatalogResult<Vec<ReportRow>>;
}

/// Catalog client backed by JSON snapshot files in a directory.
///
/// Missing snapshots are treated as empty result sets so a partial export
/// still runs the extractors it can feed.
#[derive(Debug, Clone)]
pub struct JsonCatalog {
    dir: PathBuf,
}

impl JsonCatalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn read_rows<T: DeserializeOwned>(&self, file_name: &str) -> CatalogResult<Vec<T>> {
        let path = self.dir.join(file_name);
        if !path.exists() {
            info!("No snapshot {}; treating as empty", path.display());
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&path)?;
        serde_json::from_str(&content).map_err(|e| CatalogError::SnapshotParse {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// The directory the snapshots live in
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl CatalogClient for JsonCatalog {
    async fn procedures(&self) -> CatalogResult<Vec<ProcedureRow>> {
        self.read_rows("procedures.json")
    }

    async fn view_usage(&self) -> CatalogResult<Vec<ViewUsageRow>> {
        self.read_rows("view_usage.json")
    }

    async fn job_steps(&self) -> CatalogResult<Vec<JobStepRow>> {
        self.read_rows("job_steps.json")
    }

    async fn package_index(&self) -> CatalogResult<Vec<PackageIndexRow>> {
        self.read_rows("package_index.json")
    }

    async fn reports(&self) -> CatalogResult<Vec<ReportRow>> {
        self.read_rows("reports.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_snapshot_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = JsonCatalog::new(dir.path());
        assert!(catalog.procedures().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reads_procedure_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("procedures.json"),
            r#"[{"db":"edw","schema_name":"dbo","name":"usp_load","definition":"select 1"}]"#,
        )
        .unwrap();

        let catalog = JsonCatalog::new(dir.path());
        let rows = catalog.procedures().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "usp_load");
    }

    #[tokio::test]
    async fn test_bad_snapshot_is_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("reports.json"), "{").unwrap();

        let catalog = JsonCatalog::new(dir.path());
        assert!(matches!(
            catalog.reports().await,
            Err(CatalogError::SnapshotParse { .. })
        ));
    }
}
