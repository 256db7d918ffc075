//! Rejection and error types for the query guard.
//!
//! A [`Rejection`] is a policy outcome, not a failure of the guard: every
//! malformed or dangerous candidate resolves to one, with a reason that is
//! safe to show to the end user. [`GuardError`] covers the only real error,
//! a guard that cannot be built from its schema.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Why a candidate query was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionKind {
    /// Candidate is missing or blank.
    EmptyOrInvalidInput,
    /// Candidate does not begin with SELECT.
    NotSelectStatement,
    /// Candidate contains a denylisted token.
    DangerousKeyword,
    /// Candidate holds more than one statement.
    MultipleStatements,
    /// Candidate references a column that must never be exposed.
    RestrictedColumn,
    /// Candidate references a table outside the allowlist.
    DisallowedTable,
    /// Candidate matches a known injection or probing shape.
    SuspiciousPattern,
    /// Candidate could not be parsed (strict mode only).
    UnparseableQuery,
}

impl fmt::Display for RejectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RejectionKind::EmptyOrInvalidInput => "EMPTY_OR_INVALID_INPUT",
            RejectionKind::NotSelectStatement => "NOT_SELECT_STATEMENT",
            RejectionKind::DangerousKeyword => "DANGEROUS_KEYWORD",
            RejectionKind::MultipleStatements => "MULTIPLE_STATEMENTS",
            RejectionKind::RestrictedColumn => "RESTRICTED_COLUMN",
            RejectionKind::DisallowedTable => "DISALLOWED_TABLE",
            RejectionKind::SuspiciousPattern => "SUSPICIOUS_PATTERN",
            RejectionKind::UnparseableQuery => "UNPARSEABLE_QUERY",
        };
        write!(f, "{}", s)
    }
}

/// A policy rejection with a user-presentable reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    /// The kind of rejection.
    pub kind: RejectionKind,
    /// Human-readable reason.
    pub reason: String,
}

impl Rejection {
    /// Create a new rejection.
    pub fn new(kind: RejectionKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }

    /// Blank or otherwise unusable input.
    pub fn invalid_input() -> Self {
        Self::new(RejectionKind::EmptyOrInvalidInput, "query invalid")
    }

    /// The statement does not start with an allowed operation.
    pub fn not_select() -> Self {
        Self::new(
            RejectionKind::NotSelectStatement,
            "only SELECT queries are allowed",
        )
    }

    /// A denylisted token was found; `token` is named in the reason.
    pub fn dangerous_keyword(token: &str) -> Self {
        Self::new(
            RejectionKind::DangerousKeyword,
            format!("query contains a dangerous operation: {}", token),
        )
    }

    /// More than one non-empty statement separated by `;`.
    pub fn multiple_statements() -> Self {
        Self::new(
            RejectionKind::MultipleStatements,
            "multiple statements are not allowed",
        )
    }

    /// A restricted column is referenced.
    pub fn restricted_column(column: &str) -> Self {
        Self::new(
            RejectionKind::RestrictedColumn,
            format!("access to column '{}' is not allowed", column),
        )
    }

    /// A referenced table is outside the allowlist.
    pub fn disallowed_table(table: &str) -> Self {
        Self::new(
            RejectionKind::DisallowedTable,
            format!("table '{}' is not allowed", table),
        )
    }

    /// The candidate matches a suspicious pattern.
    pub fn suspicious_pattern() -> Self {
        Self::new(
            RejectionKind::SuspiciousPattern,
            "query contains a suspicious pattern",
        )
    }

    /// The statement could not be parsed (strict mode).
    ///
    /// The parser message is kept out of the reason; it can echo fragments
    /// of the candidate back to the user.
    pub fn unparseable() -> Self {
        Self::new(
            RejectionKind::UnparseableQuery,
            "query could not be understood",
        )
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.reason)
    }
}

impl std::error::Error for Rejection {}

/// Errors building a guard.
#[derive(Debug, Error)]
pub enum GuardError {
    /// A restricted column name produced an unusable pattern.
    #[error("invalid pattern for restricted column '{column}': {source}")]
    InvalidPattern {
        column: String,
        #[source]
        source: regex::Error,
    },
}
