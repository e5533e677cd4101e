//! lm-ssrs - SSRS extraction for lineamap
//!
//! Report-definition XML is parsed into datasets (data source resolution,
//! command classification), each dataset resolves to the objects it reads,
//! and the rows flatten into the common record shape.

pub mod error;
pub mod objects;
pub mod rdl;

pub use error::{SsrsError, SsrsResult};
pub use objects::{extract_reports, extract_tablenames, object_list, ReportDefinition};
pub use rdl::{
    extract_server_db, parse_datasets, CommandKind, DataSourceInfo, Dataset, ReportKind,
};
