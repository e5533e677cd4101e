//! lm-sql - SQL text heuristics for lineamap
//!
//! This crate provides the script cleaner, keyword-regex table reference
//! classification, stored procedure reference extraction, and a best-effort
//! AST pass (sqlparser, MsSql dialect) with regex fallback.

pub mod ast;
pub mod cleaner;
pub mod error;
pub mod procs;
pub mod tables;

pub use ast::{extract_relations, source_tables};
pub use cleaner::{clean_sql, SqlCleaner};
pub use error::{SqlError, SqlResult};
pub use procs::{exec_target, extract_proc_names, split_proc_name, ProcParts, ProcRef};
pub use tables::{extract_table_lineage, split_statements, table_lineage, TableLineage, TargetSources};
