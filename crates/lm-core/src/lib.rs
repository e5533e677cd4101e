//! lm-core - Core library for lineamap
//!
//! This crate provides the shared lineage record types, configuration
//! parsing, qualified-name resolution, the cross-package dependency graph,
//! and the record merge step used across all lineamap components.

pub mod config;
pub mod error;
pub mod graph;
pub mod merge;
pub mod object_ref;
pub mod record;

pub use config::Config;
pub use error::{CoreError, CoreResult};
pub use graph::PackageGraph;
pub use merge::merge_records;
pub use object_ref::{strip_db_prefix, NameDefaults, ObjectRef, DEFAULT_SCHEMA};
pub use record::{LineageRecord, ObjectType, SourceSystem};
