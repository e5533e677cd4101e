//! SQL script cleaning
//!
//! Scripts pulled out of DTSX tasks, TMDL partitions, and catalog definitions
//! carry comments, bracket quoting, and session preamble that confuse the
//! reference regexes. `SqlCleaner` strips all of that with chainable steps.

use regex::Regex;
use std::sync::OnceLock;

static BLOCK_COMMENT_RE: OnceLock<Regex> = OnceLock::new();
static LINE_COMMENT_RE: OnceLock<Regex> = OnceLock::new();
static BRACKET_RE: OnceLock<Regex> = OnceLock::new();
static PREAMBLE_RES: OnceLock<Vec<Regex>> = OnceLock::new();

fn block_comment_regex() -> &'static Regex {
    BLOCK_COMMENT_RE.get_or_init(|| Regex::new(r"(?s)/\*.*?\*/").expect("valid regex"))
}

fn line_comment_regex() -> &'static Regex {
    LINE_COMMENT_RE.get_or_init(|| Regex::new(r"(?m)--.*$").expect("valid regex"))
}

fn bracket_regex() -> &'static Regex {
    BRACKET_RE.get_or_init(|| Regex::new(r"\[([^\]]+)\]").expect("valid regex"))
}

/// Session preamble that some procedures open with; none of it carries
/// lineage information.
fn preamble_regexes() -> &'static [Regex] {
    PREAMBLE_RES.get_or_init(|| {
        [
            r"(?i)\bSET\s+TRANSACTION\s+ISOLATION\s+LEVEL\s+SNAPSHOT\s+BEGIN\s+TRAN\b",
            r"(?i)\bOPEN\s+SYMMETRIC\s+KEY\s+\w+\b",
            r"(?i)\bDECRYPTION\s+BY\s+CERTIFICATE\s+\w+;?",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("valid regex"))
        .collect()
    })
}

/// Chainable SQL script cleaner
#[derive(Debug, Clone)]
pub struct SqlCleaner {
    sql: String,
}

impl SqlCleaner {
    pub fn new(sql: impl Into<String>) -> Self {
        Self { sql: sql.into() }
    }

    /// Strip `/* … */` and `-- …` comments
    pub fn remove_comments(mut self) -> Self {
        self.sql = block_comment_regex().replace_all(&self.sql, "").into_owned();
        self.sql = line_comment_regex().replace_all(&self.sql, " ").into_owned();
        self
    }

    /// Fold newlines and tabs into single spaces and trim the ends
    pub fn remove_extra_whitespace(mut self) -> Self {
        self.sql = self
            .sql
            .replace("\r\n", " ")
            .replace(['\t', '\n', '\r'], " ")
            .trim()
            .to_string();
        self
    }

    /// Unwrap `[bracketed]` identifiers
    pub fn remove_brackets(mut self) -> Self {
        self.sql = bracket_regex().replace_all(&self.sql, "$1").into_owned();
        self
    }

    /// Blank out each of the given patterns
    pub fn remove_patterns(mut self, patterns: &[Regex]) -> Self {
        for pattern in patterns {
            self.sql = pattern.replace_all(&self.sql, " ").into_owned();
        }
        self
    }

    /// The current script text
    pub fn into_sql(self) -> String {
        self.sql
    }

    /// Full cleanup: comments, whitespace, brackets, session preamble
    pub fn clean(self) -> String {
        self.remove_comments()
            .remove_extra_whitespace()
            .remove_brackets()
            .remove_patterns(preamble_regexes())
            .into_sql()
    }
}

/// Convenience for the common full cleanup
pub fn clean_sql(sql: &str) -> String {
    SqlCleaner::new(sql).clean()
}

#[cfg(test)]
#[path = "cleaner_test.rs"]
mod tests;
