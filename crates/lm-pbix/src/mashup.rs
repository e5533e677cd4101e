//! Mashup Section1.m parsing
//!
//! Older extracts keep their Power Query source in
//! `Mashup/Package/Formulas/Section1.m`. Every `Sql.Database(server, db,
//! [Query=…])` call is a lineage fact: an EXECUTE query points at a stored
//! procedure, anything else is read through its table references.

use crate::tmdl::clean_m_query;
use lm_core::ObjectType;
use lm_sql::{exec_target, source_tables, SqlCleaner};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

static SOURCE_CALL_RE: OnceLock<Regex> = OnceLock::new();

fn source_call_regex() -> &'static Regex {
    SOURCE_CALL_RE.get_or_init(|| {
        Regex::new(r#"(?s)Source\s+=\s+Sql\.Database\("([^"]+)",\s+"([^"]+)",\s+\[Query="([^"]+)"\]\),"#)
            .expect("valid regex")
    })
}

/// One upstream object referenced by a Section1.m source call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MashupSource {
    pub server: String,
    pub db: String,
    pub schema: String,
    pub object_name: Option<String>,
    pub object_type: ObjectType,
    pub query: String,
}

/// Extract every source call of an M section.
///
/// `reserved` feeds the fallback table heuristics for queries the SQL
/// parser rejects.
pub fn extract_mashup_sources(m_code: &str, reserved: &HashSet<String>) -> Vec<MashupSource> {
    let mut sources = Vec::new();

    for cap in source_call_regex().captures_iter(m_code) {
        let server = cap[1].to_lowercase();
        let db = cap[2].to_lowercase();
        let query = SqlCleaner::new(clean_m_query(&cap[3])).clean().to_lowercase();
        if query.is_empty() {
            continue;
        }

        if let Some(proc_ref) = exec_target(&query, &HashSet::new()) {
            sources.push(MashupSource {
                server,
                db,
                schema: proc_ref.schema,
                object_name: Some(proc_ref.name),
                object_type: ObjectType::Sp,
                query,
            });
            continue;
        }

        let referenced = source_tables(&query, reserved);
        if referenced.is_empty() {
            // A query with no recognizable reference still records the
            // server/database pair
            sources.push(MashupSource {
                server,
                db,
                schema: "dbo".to_string(),
                object_name: None,
                object_type: ObjectType::Table,
                query,
            });
            continue;
        }

        for table in referenced {
            let parts: Vec<&str> = table.split('.').collect();
            let db = if parts.len() == 3 {
                parts[0].to_string()
            } else {
                db.clone()
            };
            let schema = if parts.len() == 2 {
                parts[0].to_string()
            } else {
                "dbo".to_string()
            };
            sources.push(MashupSource {
                server: server.clone(),
                db,
                schema,
                object_name: parts.last().map(|p| p.to_string()),
                object_type: ObjectType::Table,
                query: query.clone(),
            });
        }
    }

    sources
}

#[cfg(test)]
#[path = "mashup_test.rs"]
mod tests;
