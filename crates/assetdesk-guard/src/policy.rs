//! Policy constants for the query guard.
//!
//! These lists are part of the guard's contract: tests exercise them
//! literally, so changes here are policy changes.

use regex::Regex;
use std::sync::LazyLock;

/// Ceiling for the row count of any accepted query.
pub const MAX_ROW_LIMIT: u64 = 100;

/// Tokens whose presence anywhere in the uppercased candidate rejects it.
///
/// Matching is by substring, so `UPDATE` also fires on `updated_at`.
pub const DANGEROUS_KEYWORDS: &[&str] = &[
    // Data modification and privileges
    "DROP", "DELETE", "UPDATE", "INSERT", "ALTER", "CREATE", "TRUNCATE", "REPLACE", "GRANT",
    "REVOKE", "EXEC", "EXECUTE",
    // Set combination
    "UNION",
    // Comments and terminators
    "--", ";--", "/*", "*/",
    // Server variables
    "@@", "@",
    // String building
    "CHAR(", "NCHAR(", "VARCHAR(", "NVARCHAR(",
    // Timing
    "WAITFOR", "DELAY", "BENCHMARK", "SLEEP",
    // File exfiltration
    "LOAD_FILE", "INTO OUTFILE", "INTO DUMPFILE",
];

/// Shapes that indicate probing rather than a data question.
pub static SUSPICIOUS_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // ' OR '1'='1
        r"(?i)'\s*OR\s+'1'\s*=\s*'1",
        // ' OR 1=1
        r"(?i)'\s*OR\s+1\s*=\s*1",
        // OR 1=1 without a leading quote
        r"(?i)\bOR\s+1\s*=\s*1\b",
        // '; --
        r"(?i)'\s*;\s*--",
        // Metadata and system schemas
        r"(?i)INFORMATION_SCHEMA",
        r"(?i)MYSQL\.",
        r"(?i)SYS\.",
        r"(?i)PG_CATALOG",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("suspicious pattern must compile"))
    .collect()
});

/// Identifier following FROM or JOIN. An opening quote is skipped so that
/// quoted names are checked like bare ones.
pub static TABLE_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b(?:FROM|JOIN)\s+[`"\[]?(\w+)"#).expect("table pattern must compile")
});

/// Any LIMIT keyword.
pub static LIMIT_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bLIMIT\b").expect("limit pattern must compile"));

/// A numeric LIMIT clause: `LIMIT n` or MySQL's `LIMIT offset, n`.
pub static LIMIT_CLAUSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bLIMIT\s+(\d+)(?:\s*,\s*(\d+))?").expect("limit clause pattern must compile")
});

/// Trailing run of semicolons and whitespace.
pub static TRAILING_TERMINATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[;\s]+$").expect("terminator pattern must compile"));

/// Build the word-boundary, case-insensitive matcher for a restricted column.
pub fn restricted_column_pattern(column: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"(?i)\b{}\b", regex::escape(column)))
}
