//! lm-catalog - Catalog access for lineamap
//!
//! The queries a live deployment issues against SQL Server, the SSIS
//! catalog, and the report server are built here as plain strings; running
//! them sits behind the `CatalogClient` trait, with a JSON-snapshot
//! implementation bundled. The catalog-driven extractors (stored
//! procedures, views, agent jobs) turn the typed rows into lineage records.

pub mod client;
pub mod error;
pub mod jobs;
pub mod queries;
pub mod rows;
pub mod sproc;
pub mod views;

pub use client::{CatalogClient, JsonCatalog};
pub use error::{CatalogError, CatalogResult};
pub use jobs::extract_job_steps;
pub use rows::{JobStepRow, PackageIndexRow, ProcedureRow, ReportRow, ViewUsageRow};
pub use sproc::extract_procedures;
pub use views::extract_views;
