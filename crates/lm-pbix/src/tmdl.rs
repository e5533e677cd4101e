//! TMDL model parsing
//!
//! `Model/model.tmdl` lists the model's tables in a PBI_QueryOrder
//! annotation; each `Model/tables/<t>.tmdl` carries a partition whose M
//! source names the upstream server/database. Two M shapes appear in the
//! wild: navigation (`Sql.Databases` plus Schema/Item steps) and an inline
//! query (`Sql.Database` with a Query option).

use crate::error::{PbixError, PbixResult};
use lm_sql::tables::table_ref_regex;
use lm_sql::SqlCleaner;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

static QUERY_ORDER_RE: OnceLock<Regex> = OnceLock::new();
static NAVIGATION_RE: OnceLock<Regex> = OnceLock::new();
static SELECT_RE: OnceLock<Regex> = OnceLock::new();

fn query_order_regex() -> &'static Regex {
    QUERY_ORDER_RE
        .get_or_init(|| Regex::new(r"annotation PBI_QueryOrder = \[(.*?)\]").expect("valid regex"))
}

/// Navigation-style partition: Sql.Databases then Name/Schema/Item steps
fn navigation_regex() -> &'static Regex {
    NAVIGATION_RE.get_or_init(|| {
        Regex::new(
            r#"(?s)mode:\s+import\s+source\s*=\s*let\s+Source\s*=\s*Sql\.Databases\("([^"]*)"\),\s+[^ ]+\s*=\s*Source\{\[Name="([^"]*)"\]\}\[Data\],\s+[^ ]+\s*=\s*[^ ]+\{\[Schema="([^"]*?)",Item="([^"]*?)"\]\}\[Data\]"#,
        )
        .expect("valid regex")
    })
}

/// Inline-query partition: Sql.Database with a Query option
fn select_regex() -> &'static Regex {
    SELECT_RE.get_or_init(|| {
        Regex::new(
            r#"(?s)mode:\s+import\s+source\s*=\s*let\s+Source\s*=\s*Sql\.Database\("([^"]*)",\s*"([^"]*)",\s*\[Query="([^"]*)"\]\)"#,
        )
        .expect("valid regex")
    })
}

/// One upstream object a partition reads from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionSource {
    pub server: String,
    pub db: String,
    pub schema: String,
    pub object: String,
}

/// Read a TMDL file, tolerating a UTF-8 BOM
pub fn read_tmdl(path: &Path) -> PbixResult<String> {
    let content = std::fs::read_to_string(path).map_err(|e| PbixError::IoWithPath {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(content.trim_start_matches('\u{feff}').to_string())
}

/// Table names from the PBI_QueryOrder annotation, skipping the
/// `Errors in …` load-error tables Power BI adds.
pub fn query_order(model_tmdl: &str) -> Vec<String> {
    let Some(cap) = query_order_regex().captures(model_tmdl) else {
        return Vec::new();
    };
    cap[1]
        .split(',')
        .map(|t| t.trim().trim_matches('"').to_string())
        .filter(|t| !t.is_empty() && !t.starts_with("Errors in"))
        .collect()
}

/// Unescape the M encoding of a query (`#(lf)` line feeds)
pub fn clean_m_query(m_query: &str) -> String {
    m_query.replace("#(lf)", "\n").trim().to_string()
}

/// The upstream objects of a table partition, or `None` when neither M
/// shape matches.
pub fn partition_sources(tmdl_content: &str) -> Option<Vec<PartitionSource>> {
    if let Some(cap) = navigation_regex().captures(tmdl_content) {
        return Some(vec![PartitionSource {
            server: cap[1].to_lowercase(),
            db: cap[2].to_lowercase(),
            schema: cap[3].to_lowercase(),
            object: cap[4].to_lowercase(),
        }]);
    }

    if let Some(cap) = select_regex().captures(tmdl_content) {
        let server = cap[1].to_lowercase();
        let db_from_call = cap[2].to_lowercase();
        let query = SqlCleaner::new(clean_m_query(&cap[3])).clean();

        let mut sources = Vec::new();
        for table_cap in table_ref_regex().captures_iter(&query) {
            let name = table_cap[1].to_lowercase();
            let parts: Vec<&str> = name.split('.').collect();
            let db = if parts.len() == 3 {
                parts[0].to_string()
            } else {
                db_from_call.clone()
            };
            let schema = if parts.len() == 2 {
                parts[0].to_string()
            } else {
                "dbo".to_string()
            };
            sources.push(PartitionSource {
                server: server.clone(),
                db,
                schema,
                object: parts.last().map(|p| p.to_string()).unwrap_or(name.clone()),
            });
        }
        return Some(sources);
    }

    None
}

#[cfg(test)]
#[path = "tmdl_test.rs"]
mod tests;
