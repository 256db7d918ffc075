//! Guard outcomes.

use crate::error::{Rejection, RejectionKind};
use serde::Serialize;
use std::fmt;

/// An accepted candidate after whitespace and limit normalization.
///
/// Only the guard constructs these, so holding one means the statement
/// passed every check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SanitizedQuery(String);

impl SanitizedQuery {
    pub(crate) fn new(sql: String) -> Self {
        Self(sql)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for SanitizedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SanitizedQuery {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Flat, serializable form of a guard decision.
///
/// Exactly one of `sanitized_query` and `reason` is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardResult {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sanitized_query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<RejectionKind>,
}

impl GuardResult {
    pub fn accepted(query: SanitizedQuery) -> Self {
        Self {
            ok: true,
            sanitized_query: Some(query.into_string()),
            reason: None,
            kind: None,
        }
    }

    pub fn rejected(rejection: Rejection) -> Self {
        Self {
            ok: false,
            sanitized_query: None,
            reason: Some(rejection.reason),
            kind: Some(rejection.kind),
        }
    }
}

impl From<Result<SanitizedQuery, Rejection>> for GuardResult {
    fn from(result: Result<SanitizedQuery, Rejection>) -> Self {
        match result {
            Ok(query) => Self::accepted(query),
            Err(rejection) => Self::rejected(rejection),
        }
    }
}
