//! lm-pbix - Power BI extraction for lineamap
//!
//! Extracted report folders are scanned for one of three layouts
//! (Connections.json, Mashup Section1.m, TMDL model) and resolved to the
//! upstream server/database/schema/object each report reads from.

pub mod connections;
pub mod error;
pub mod mashup;
pub mod metadata;
pub mod tmdl;
pub mod unpack;

pub use connections::{extract_connection_details, parse_connection_string, ConnectionDetails};
pub use error::{PbixError, PbixResult};
pub use mashup::{extract_mashup_sources, MashupSource};
pub use metadata::{extract_report, report_folders, scan_reports, to_records, ReportMetadata};
pub use tmdl::{clean_m_query, partition_sources, query_order, read_tmdl, PartitionSource};
pub use unpack::{extract_pbix, pbix_files, unpack_all};
