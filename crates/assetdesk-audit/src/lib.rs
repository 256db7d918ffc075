//! # assetdesk-audit
//!
//! Audit trail for natural-language queries.
//!
//! Every chat request leaves a correlated sequence of events: the question,
//! the guard's decision on the generated SQL, and the execution outcome.
//!
//! - **File output**: JSON Lines under the configured directory
//! - **Console output**: human-readable log lines
//!
//! | Event Type | Description |
//! |------------|-------------|
//! | `ChatRequested` | A question was received |
//! | `QueryAccepted` | Generated SQL passed the guard |
//! | `QueryRejected` | Generated SQL was rejected |
//! | `QueryExecuted` | The query ran |
//! | `QueryFailed` | The query failed in the database |
//! | `RateLimited` | The request was throttled |
//!
//! ```rust,no_run
//! use assetdesk_audit::AuditLogger;
//! use assetdesk_core::AuditConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let logger = AuditLogger::new(AuditConfig::default())?;
//! logger.log_chat_requested("42", "req-1", "How many laptops are assigned?").await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod event;
pub mod logger;
pub mod storage;

pub use error::AuditError;
pub use event::{AuditEvent, AuditEventBuilder, AuditEventType};
pub use logger::{AuditFilter, AuditLogger};
pub use storage::{AuditStorage, ConsoleStorage, DualStorage, FileStorage, NullStorage};
