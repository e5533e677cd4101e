//! Stored procedure reference extraction

use crate::cleaner::SqlCleaner;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

static PROC_NAME_RE: OnceLock<Regex> = OnceLock::new();
static EXEC_TARGET_RE: OnceLock<Regex> = OnceLock::new();

/// CREATE PROCEDURE / EXEC reference, tolerating a `@ret =` assignment and
/// bracketed parts
fn proc_name_regex() -> &'static Regex {
    PROC_NAME_RE.get_or_init(|| {
        Regex::new(r"(?i)\b(?:CREATE\s+PROC(?:EDURE)?|EXEC(?:UTE)?)\s+(?:@\w+\s*=\s*)?([\[\]\w]+(?:\.[\[\]\w]+){0,2})")
            .expect("valid regex")
    })
}

fn exec_target_regex() -> &'static Regex {
    EXEC_TARGET_RE.get_or_init(|| {
        Regex::new(r"(?i)EXEC(?:UTE)?\s+(?:@\w+\s?=\s?)?([\w\.]+)").expect("valid regex")
    })
}

/// A procedure reference resolved to schema + name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcRef {
    pub schema: String,
    pub name: String,
}

/// A job-step procedure reference resolved against the step's database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcParts {
    pub db: Option<String>,
    pub schema: String,
    pub name: Option<String>,
}

/// All procedure names referenced by CREATE PROCEDURE or EXEC in a script,
/// brackets removed, lowercased, deduplicated in first-seen order.
pub fn extract_proc_names(sql: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();

    for cap in proc_name_regex().captures_iter(sql) {
        let Some(raw) = cap.get(1) else { continue };
        let name = SqlCleaner::new(raw.as_str())
            .remove_brackets()
            .into_sql()
            .to_lowercase();
        if !name.is_empty() && seen.insert(name.clone()) {
            names.push(name);
        }
    }

    names
}

/// The first EXEC target of a statement as (schema, proc).
///
/// A two-part name whose head is a known database is really `db.proc`, so
/// the schema falls back to `dbo`.
pub fn exec_target(sql: &str, db_set: &HashSet<String>) -> Option<ProcRef> {
    let cap = exec_target_regex().captures(sql)?;
    let full = cap.get(1)?.as_str();
    let parts: Vec<&str> = full.split('.').collect();

    let (schema, name) = match parts.as_slice() {
        [db_or_schema, name] => {
            if db_set.contains(&db_or_schema.to_lowercase()) {
                ("dbo".to_string(), name.to_string())
            } else {
                (db_or_schema.to_string(), name.to_string())
            }
        }
        [_, schema, name] => (schema.to_string(), name.to_string()),
        [name] => ("dbo".to_string(), name.to_string()),
        _ => return None,
    };

    Some(ProcRef { schema, name })
}

/// Split a job-step procedure name into (db, schema, name) against the
/// database the step runs in.
///
/// Two-part names are ambiguous (`stepdb.proc` vs `schema.proc` vs
/// `otherdb.schema`); the step database and the known-database list decide.
pub fn split_proc_name(
    name: &str,
    default_db: Option<&str>,
    db_set: &HashSet<String>,
) -> ProcParts {
    let parts: Vec<&str> = name.split('.').collect();

    match parts.as_slice() {
        [db, schema, proc] => ProcParts {
            db: Some(db.to_string()),
            schema: schema.to_string(),
            name: Some(proc.to_string()),
        },
        [head, tail] => {
            if Some(*head) == default_db {
                ProcParts {
                    db: default_db.map(str::to_string),
                    schema: "dbo".to_string(),
                    name: Some(tail.to_string()),
                }
            } else if !db_set.contains(&head.to_lowercase()) {
                ProcParts {
                    db: default_db.map(str::to_string),
                    schema: head.to_string(),
                    name: Some(tail.to_string()),
                }
            } else {
                // A known database followed by a schema only: no proc name
                ProcParts {
                    db: Some(head.to_string()),
                    schema: tail.to_string(),
                    name: None,
                }
            }
        }
        [proc] => ProcParts {
            db: default_db.map(str::to_string),
            schema: "dbo".to_string(),
            name: Some(proc.to_string()),
        },
        _ => ProcParts {
            db: default_db.map(str::to_string),
            schema: "dbo".to_string(),
            name: None,
        },
    }
}

#[cfg(test)]
#[path = "procs_test.rs"]
mod tests;
