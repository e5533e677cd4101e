//! Best-effort AST relation extraction
//!
//! Well-formed statements (SSRS dataset queries, M-language inline queries)
//! get the real parser; anything the T-SQL grammar rejects falls back to the
//! keyword regexes in [`crate::tables`].

use crate::error::{SqlError, SqlResult};
use crate::tables;
use log::debug;
use sqlparser::ast::visit_relations;
use sqlparser::dialect::MsSqlDialect;
use sqlparser::parser::Parser;
use std::collections::{BTreeSet, HashSet};
use std::ops::ControlFlow;

/// Extract every relation referenced by a script via the AST.
///
/// Walks FROM clauses, JOINs, and subqueries with `visit_relations`; write
/// targets are included too, so this is a reference set, not a
/// target/source split.
pub fn extract_relations(sql: &str) -> SqlResult<BTreeSet<String>> {
    let sql = sql.trim();
    if sql.is_empty() {
        return Err(SqlError::EmptySql);
    }

    let statements = Parser::parse_sql(&MsSqlDialect {}, sql)
        .map_err(|e| SqlError::ParseError(e.to_string()))?;

    let mut relations = BTreeSet::new();
    for statement in &statements {
        let _ = visit_relations(statement, |relation| {
            relations.insert(relation.to_string().to_lowercase());
            ControlFlow::<()>::Continue(())
        });
    }

    Ok(relations)
}

/// Source tables of a read-only statement: AST first, regex fallback.
///
/// Statements that parse get their relations from the AST. Everything else
/// (procedural T-SQL, vendor syntax) goes through the keyword heuristics.
pub fn source_tables(sql: &str, reserved: &HashSet<String>) -> BTreeSet<String> {
    match extract_relations(sql) {
        Ok(relations) if !relations.is_empty() => relations,
        Ok(_) => tables::table_lineage(sql, reserved).sources,
        Err(e) => {
            debug!("AST parse failed, using keyword extraction: {e}");
            tables::table_lineage(sql, reserved).sources
        }
    }
}

#[cfg(test)]
#[path = "ast_test.rs"]
mod tests;
