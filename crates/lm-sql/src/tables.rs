//! Table reference extraction from SQL text
//!
//! Dialect-heavy T-SQL rarely parses cleanly, so classification rides on a
//! keyword regex: references after INTO/MERGE/UPDATE are write targets,
//! references after FROM/JOIN/USING are read sources. Aliases, cursors, and
//! reserved words are filtered out rather than parsed.

use log::warn;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::OnceLock;

static TABLE_REF_RE: OnceLock<Regex> = OnceLock::new();
static TABLE_ALIAS_RE: OnceLock<Regex> = OnceLock::new();
static CURSOR_RE: OnceLock<Regex> = OnceLock::new();

/// Keyword followed by a dotted name of up to four parts
pub fn table_ref_regex() -> &'static Regex {
    TABLE_REF_RE.get_or_init(|| {
        Regex::new(r"(?i)\b(?:FROM|JOIN|UPDATE|INTO|MERGE|USING)\s+([\w\-]+(?:\.[\w\-]+){0,3})")
            .expect("valid regex")
    })
}

/// Same capture plus an optional trailing alias
fn table_alias_regex() -> &'static Regex {
    TABLE_ALIAS_RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(?:FROM|JOIN|UPDATE|INTO|MERGE|USING)\s+([\w\-]+(?:\.[\w\-]+){0,3})(?:\s+AS)?\s*(\w+)?\b",
        )
        .expect("valid regex")
    })
}

fn cursor_regex() -> &'static Regex {
    CURSOR_RE.get_or_init(|| {
        Regex::new(r"(?i)\bDECLARE\s+(\w+)\s+CURSOR\s+FOR\b").expect("valid regex")
    })
}

/// Classified table references from one script
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableLineage {
    /// Tables written by the script
    pub targets: BTreeSet<String>,
    /// Tables read by the script
    pub sources: BTreeSet<String>,
}

impl TableLineage {
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty() && self.sources.is_empty()
    }
}

/// Sources consolidated under one target of a multi-statement script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSources {
    /// The written table, absent for read-only scripts
    pub target: Option<String>,
    /// Everything read while producing it
    pub sources: BTreeSet<String>,
}

/// Classify every keyword-captured table reference in a script.
///
/// `reserved` is an uppercase word set; captures matching it are discarded.
pub fn table_lineage(sql: &str, reserved: &HashSet<String>) -> TableLineage {
    let mut aliases: HashSet<String> = HashSet::new();
    let mut cursors: HashSet<String> = HashSet::new();
    let mut matches: Vec<String> = Vec::new();

    for cap in table_alias_regex().captures_iter(sql) {
        if let Some(alias) = cap.get(2) {
            if !reserved.contains(&alias.as_str().to_uppercase()) {
                aliases.insert(alias.as_str().to_lowercase());
            }
        }
        matches.push(cap.get(0).map(|m| m.as_str().to_string()).unwrap_or_default());
    }

    // Second pass without the alias tail: a name wedged between two keywords
    // ("FROM a JOIN b") is only captured here.
    for m in table_ref_regex().find_iter(sql) {
        matches.push(m.as_str().to_string());
    }

    for cap in cursor_regex().captures_iter(sql) {
        if let Some(name) = cap.get(1) {
            cursors.insert(name.as_str().to_lowercase());
        }
    }

    let mut lineage = TableLineage::default();

    for (index, matched) in matches.iter().enumerate() {
        let mut tokens = matched.split_whitespace();
        let (Some(keyword), Some(name)) = (tokens.next(), tokens.next()) else {
            continue;
        };
        let keyword = keyword.to_uppercase();
        let table = name.to_lowercase();
        let is_alias = aliases.contains(&table);
        let is_reserved = reserved.contains(&table.to_uppercase());

        match keyword.as_str() {
            "INTO" | "MERGE" | "UPDATE" if !is_alias && !is_reserved => {
                lineage.targets.insert(table);
            }
            "UPDATE" if is_alias => {
                // UPDATE via alias: the real target is the next captured
                // reference ("UPDATE a SET … FROM edw.orders a")
                if let Some(next) = matches.get(index + 1) {
                    if let Some(name) = next.split_whitespace().nth(1) {
                        lineage.targets.insert(name.to_lowercase());
                    }
                } else {
                    warn!("UPDATE with alias at end of script, target unresolved: {matched}");
                }
            }
            "FROM" | "JOIN" | "USING"
                if !is_alias && !is_reserved && !cursors.contains(&table) =>
            {
                lineage.sources.insert(table);
            }
            _ => {}
        }
    }

    lineage
}

/// Split a script at each DDL keyword, carrying text through the next `;`
/// (or the end of the script). The returned statements are lowercased.
pub fn split_statements(sql: &str, ddl_keywords: &[String]) -> Vec<String> {
    let lowered = sql.to_lowercase();
    let mut statements = Vec::new();

    for keyword in ddl_keywords {
        let pattern = format!(r"\s\b{}\b\s", regex::escape(keyword));
        let Ok(re) = Regex::new(&pattern) else {
            continue;
        };
        for m in re.find_iter(&lowered) {
            let start = m.start();
            let end = lowered[start..]
                .find(';')
                .map(|p| start + p)
                .unwrap_or(lowered.len());
            let statement = lowered[start..end].trim();
            if !statement.is_empty() {
                statements.push(statement.to_string());
            }
        }
    }

    statements
}

/// Extract per-target lineage from a script.
///
/// Single-target (or target-free) scripts produce one entry. Scripts that
/// write several tables are split into DDL-keyword statements and each
/// target accumulates only the sources of its own statements.
pub fn extract_table_lineage(
    sql: &str,
    reserved: &HashSet<String>,
    ddl_keywords: &[String],
) -> Vec<TargetSources> {
    let whole = table_lineage(sql, reserved);

    if whole.targets.len() <= 1 {
        return vec![TargetSources {
            target: whole.targets.into_iter().next(),
            sources: whole.sources,
        }];
    }

    let mut consolidated: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for statement in split_statements(sql, ddl_keywords) {
        let stmt_lineage = table_lineage(&statement, reserved);
        for target in stmt_lineage.targets {
            consolidated
                .entry(target)
                .or_default()
                .extend(stmt_lineage.sources.iter().cloned());
        }
    }

    // Targets the splitter never saw (keyword at position 0, say) still get
    // the whole-script sources rather than vanishing.
    for target in whole.targets {
        consolidated
            .entry(target)
            .or_insert_with(|| whole.sources.clone());
    }

    consolidated
        .into_iter()
        .map(|(target, sources)| TargetSources {
            target: Some(target),
            sources,
        })
        .collect()
}

#[cfg(test)]
#[path = "tables_test.rs"]
mod tests;
