//! # assetdesk-guard
//!
//! Gatekeeper for SQL produced by an external natural-language generator.
//!
//! A candidate either comes out as a [`SanitizedQuery`] that is safe to run
//! against the asset database, or as a [`Rejection`] carrying a reason that
//! may be shown to the end user. The checks are textual by default:
//!
//! - the statement must start with `SELECT`
//! - no denylisted token may appear anywhere in it
//! - it must be a single statement
//! - no restricted column may be mentioned
//! - every table after `FROM` or `JOIN` must be allowlisted
//! - no injection or metadata-probing shape may appear
//!
//! Accepted statements get their trailing terminators removed and a
//! `LIMIT` of at most [`MAX_ROW_LIMIT`].
//!
//! In [`GuardMode::Strict`] the candidate is additionally parsed and every
//! relation it reads from is checked structurally, which catches comma joins
//! and schema-qualified names the positional check misses.
//!
//! ```
//! use assetdesk_core::SchemaDescriptor;
//! use assetdesk_guard::QueryGuard;
//! use std::sync::Arc;
//!
//! let guard = QueryGuard::new(Arc::new(SchemaDescriptor::asset_inventory())).unwrap();
//! let sql = guard.process("SELECT name FROM assets").unwrap();
//! assert_eq!(sql.as_str(), "SELECT name FROM assets LIMIT 100");
//! assert!(guard.process("SELECT password FROM users").is_err());
//! ```

pub mod analyzer;
pub mod error;
pub mod guard;
pub mod policy;
pub mod result;

pub use analyzer::SqlAnalyzer;
pub use assetdesk_core::GuardMode;
pub use error::{GuardError, Rejection, RejectionKind};
pub use guard::QueryGuard;
pub use policy::{DANGEROUS_KEYWORDS, MAX_ROW_LIMIT};
pub use result::{GuardResult, SanitizedQuery};
