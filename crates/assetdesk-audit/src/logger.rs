//! Audit logger implementation.
//!
//! Provides the main `AuditLogger` type with one helper per step of the
//! chat pipeline.

use assetdesk_core::AuditConfig;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::AuditError;
use crate::event::{AuditEvent, AuditEventType};
use crate::storage::{AuditStorage, ConsoleStorage, DualStorage, FileStorage, NullStorage};

/// The main audit logger.
pub struct AuditLogger {
    config: AuditConfig,
    storage: Arc<dyn AuditStorage>,
}

impl std::fmt::Debug for AuditLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditLogger")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AuditLogger {
    /// Create a new audit logger with the given configuration.
    pub fn new(config: AuditConfig) -> Result<Self, AuditError> {
        let storage: Arc<dyn AuditStorage> = if !config.enabled {
            Arc::new(NullStorage::new())
        } else {
            let file_path = Self::log_path(&config);

            if config.stdout {
                Arc::new(DualStorage::new(&file_path)?)
            } else {
                Arc::new(FileStorage::new(&file_path)?)
            }
        };

        Ok(Self { config, storage })
    }

    /// Create a logger with a custom storage backend.
    pub fn with_storage(config: AuditConfig, storage: Arc<dyn AuditStorage>) -> Self {
        Self { config, storage }
    }

    /// Create a disabled (no-op) logger.
    pub fn disabled() -> Self {
        Self {
            config: AuditConfig {
                enabled: false,
                ..Default::default()
            },
            storage: Arc::new(NullStorage::new()),
        }
    }

    /// Create a console-only logger (useful for development).
    pub fn console_only() -> Self {
        Self {
            config: AuditConfig {
                enabled: true,
                stdout: true,
                ..Default::default()
            },
            storage: Arc::new(ConsoleStorage::new()),
        }
    }

    /// The JSON Lines file written for `config`.
    pub fn log_path(config: &AuditConfig) -> PathBuf {
        let mut path = PathBuf::from(&config.directory);
        path.push("audit.log");
        path
    }

    /// Check if logging is enabled.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Log an audit event.
    pub async fn log(&self, event: AuditEvent) -> Result<(), AuditError> {
        if !self.config.enabled {
            return Ok(());
        }

        tracing::debug!(
            event_id = %event.event_id,
            event_type = %event.event_type,
            user = %event.user_id,
            "Audit event"
        );

        self.storage.store(event).await
    }

    /// Log an incoming chat question.
    pub async fn log_chat_requested(
        &self,
        user_id: &str,
        correlation_id: &str,
        question: &str,
    ) -> Result<(), AuditError> {
        let event = AuditEvent::builder(AuditEventType::ChatRequested, user_id)
            .correlation_id(correlation_id)
            .question(question)
            .build();

        self.log(event).await
    }

    /// Log generated SQL that passed the guard.
    pub async fn log_query_accepted(
        &self,
        user_id: &str,
        correlation_id: &str,
        sql: &str,
    ) -> Result<(), AuditError> {
        let event = AuditEvent::builder(AuditEventType::QueryAccepted, user_id)
            .correlation_id(correlation_id)
            .sql(sql)
            .build();

        self.log(event).await
    }

    /// Log generated SQL that the guard rejected.
    ///
    /// The candidate text is dropped when `log_rejected_sql` is off.
    pub async fn log_query_rejected(
        &self,
        user_id: &str,
        correlation_id: &str,
        candidate: &str,
        kind: &str,
        reason: &str,
    ) -> Result<(), AuditError> {
        let mut builder = AuditEvent::builder(AuditEventType::QueryRejected, user_id)
            .correlation_id(correlation_id)
            .rejection_kind(kind)
            .error(reason);

        if self.config.log_rejected_sql {
            builder = builder.sql(candidate);
        }

        self.log(builder.build()).await
    }

    /// Log a successful execution.
    pub async fn log_query_executed(
        &self,
        user_id: &str,
        correlation_id: &str,
        sql: &str,
        row_count: u64,
        duration_ms: u64,
    ) -> Result<(), AuditError> {
        let event = AuditEvent::builder(AuditEventType::QueryExecuted, user_id)
            .correlation_id(correlation_id)
            .sql(sql)
            .row_count(row_count)
            .duration_ms(duration_ms)
            .build();

        self.log(event).await
    }

    /// Log a failed execution.
    pub async fn log_query_failed(
        &self,
        user_id: &str,
        correlation_id: &str,
        sql: &str,
        error: &str,
    ) -> Result<(), AuditError> {
        let event = AuditEvent::builder(AuditEventType::QueryFailed, user_id)
            .correlation_id(correlation_id)
            .sql(sql)
            .error(error)
            .build();

        self.log(event).await
    }

    /// Log a throttled request.
    pub async fn log_rate_limited(
        &self,
        user_id: &str,
        reset_in_secs: u64,
    ) -> Result<(), AuditError> {
        let event = AuditEvent::builder(AuditEventType::RateLimited, user_id)
            .meta(serde_json::json!({ "reset_in_secs": reset_in_secs }))
            .build();

        self.log(event).await
    }

    /// Query audit events with filters.
    pub async fn query(&self, filter: AuditFilter) -> Result<Vec<AuditEvent>, AuditError> {
        self.storage.query(filter).await
    }

    /// Count audit events matching a filter (ignores limit/offset).
    pub async fn count(&self, filter: AuditFilter) -> Result<usize, AuditError> {
        self.storage.count(filter).await
    }

    /// Get an audit event by ID.
    pub async fn get(&self, event_id: uuid::Uuid) -> Result<Option<AuditEvent>, AuditError> {
        self.storage.get(event_id).await
    }
}

/// Filter for querying audit events.
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    /// Filter by user.
    pub user_id: Option<String>,
    /// Filter by event type.
    pub event_type: Option<AuditEventType>,
    /// Filter by correlation ID.
    pub correlation_id: Option<String>,
    /// Filter by start time.
    pub start_time: Option<DateTime<Utc>>,
    /// Filter by end time.
    pub end_time: Option<DateTime<Utc>>,
    /// Maximum number of results.
    pub limit: Option<usize>,
    /// Offset for pagination.
    pub offset: Option<usize>,
    /// Return newest events first.
    pub newest_first: bool,
}

impl AuditFilter {
    /// Check whether an event passes every set criterion.
    pub fn matches(&self, event: &AuditEvent) -> bool {
        if let Some(ref user) = self.user_id {
            if &event.user_id != user {
                return false;
            }
        }
        if let Some(event_type) = self.event_type {
            if event.event_type != event_type {
                return false;
            }
        }
        if let Some(ref correlation_id) = self.correlation_id {
            if event.correlation_id.as_ref() != Some(correlation_id) {
                return false;
            }
        }
        if let Some(start) = self.start_time {
            if event.occurred_at < start {
                return false;
            }
        }
        if let Some(end) = self.end_time {
            if event.occurred_at > end {
                return false;
            }
        }
        true
    }

    /// Filter, order and page a list of events held oldest first.
    pub fn apply(&self, events: Vec<AuditEvent>) -> Vec<AuditEvent> {
        let mut results: Vec<_> = events.into_iter().filter(|e| self.matches(e)).collect();

        if self.newest_first {
            results.reverse();
        }

        results
            .into_iter()
            .skip(self.offset.unwrap_or(0))
            .take(self.limit.unwrap_or(usize::MAX))
            .collect()
    }
}
