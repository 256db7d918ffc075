//! Audit event types.
//!
//! One event is recorded for each step a chat request takes through the
//! pipeline: the question arriving, the guard's decision on the generated
//! SQL, and the outcome of executing it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Type of audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    /// A chat question was received.
    ChatRequested,
    /// Generated SQL passed the guard.
    QueryAccepted,
    /// Generated SQL was rejected by the guard.
    QueryRejected,
    /// An accepted query ran successfully.
    QueryExecuted,
    /// An accepted query failed in the database.
    QueryFailed,
    /// The request was throttled.
    RateLimited,
}

impl std::fmt::Display for AuditEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ChatRequested => write!(f, "CHAT_REQUESTED"),
            Self::QueryAccepted => write!(f, "QUERY_ACCEPTED"),
            Self::QueryRejected => write!(f, "QUERY_REJECTED"),
            Self::QueryExecuted => write!(f, "QUERY_EXECUTED"),
            Self::QueryFailed => write!(f, "QUERY_FAILED"),
            Self::RateLimited => write!(f, "RATE_LIMITED"),
        }
    }
}

impl std::str::FromStr for AuditEventType {
    type Err = String;

    /// Accepts the snake_case storage name or the upper-case display name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "chat_requested" => Ok(Self::ChatRequested),
            "query_accepted" => Ok(Self::QueryAccepted),
            "query_rejected" => Ok(Self::QueryRejected),
            "query_executed" => Ok(Self::QueryExecuted),
            "query_failed" => Ok(Self::QueryFailed),
            "rate_limited" => Ok(Self::RateLimited),
            other => Err(format!("unknown audit event type '{}'", other)),
        }
    }
}

/// An audit event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Unique event ID.
    pub event_id: Uuid,

    /// When the event occurred.
    pub occurred_at: DateTime<Utc>,

    /// Event type.
    pub event_type: AuditEventType,

    /// Identity of the requesting user.
    pub user_id: String,

    /// The natural-language question.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,

    /// Candidate or sanitized SQL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sql: Option<String>,

    /// Guard rejection kind, for `QueryRejected`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_kind: Option<String>,

    /// Number of rows returned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_count: Option<u64>,

    /// Duration in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,

    /// Error or rejection reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Correlates all events of one chat request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,

    /// Additional metadata.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub meta: serde_json::Value,
}

impl AuditEvent {
    /// Create a new audit event with the given type and user.
    pub fn new(event_type: AuditEventType, user_id: impl Into<String>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            event_type,
            user_id: user_id.into(),
            question: None,
            sql: None,
            rejection_kind: None,
            row_count: None,
            duration_ms: None,
            error: None,
            correlation_id: None,
            meta: serde_json::Value::Null,
        }
    }

    /// Create a builder for an audit event.
    pub fn builder(event_type: AuditEventType, user_id: impl Into<String>) -> AuditEventBuilder {
        AuditEventBuilder::new(event_type, user_id)
    }

    /// Format the event as a human-readable log line.
    ///
    /// Format: `[timestamp] EVENT_TYPE user=... [sql=...] [rows=...]`
    pub fn to_log_line(&self) -> String {
        let mut line = format!(
            "[{}] {} user={}",
            self.occurred_at.format("%Y-%m-%dT%H:%M:%S%.3fZ"),
            self.event_type,
            self.user_id,
        );

        if let Some(ref question) = self.question {
            line.push_str(&format!(" question=\"{}\"", preview(question)));
        }

        if let Some(ref sql) = self.sql {
            line.push_str(&format!(" sql=\"{}\"", preview(sql)));
        }

        if let Some(ref kind) = self.rejection_kind {
            line.push_str(&format!(" kind={}", kind));
        }

        if let Some(row_count) = self.row_count {
            line.push_str(&format!(" rows={}", row_count));
        }

        if let Some(duration) = self.duration_ms {
            line.push_str(&format!(" duration_ms={}", duration));
        }

        if let Some(ref error) = self.error {
            line.push_str(&format!(" error=\"{}\"", error.replace('"', "'")));
        }

        line
    }
}

/// Truncate long text to 100 characters on one line.
fn preview(text: &str) -> String {
    let flat = text.replace('\n', " ").replace('"', "'");
    match flat.char_indices().nth(100) {
        Some((idx, _)) => format!("{}...", &flat[..idx]),
        None => flat,
    }
}

/// Builder for creating audit events.
#[derive(Debug)]
pub struct AuditEventBuilder {
    event: AuditEvent,
}

impl AuditEventBuilder {
    /// Create a new builder with required fields.
    pub fn new(event_type: AuditEventType, user_id: impl Into<String>) -> Self {
        Self {
            event: AuditEvent::new(event_type, user_id),
        }
    }

    /// Set the question.
    pub fn question(mut self, question: impl Into<String>) -> Self {
        self.event.question = Some(question.into());
        self
    }

    /// Set the SQL query.
    pub fn sql(mut self, sql: impl Into<String>) -> Self {
        self.event.sql = Some(sql.into());
        self
    }

    /// Set the rejection kind.
    pub fn rejection_kind(mut self, kind: impl Into<String>) -> Self {
        self.event.rejection_kind = Some(kind.into());
        self
    }

    /// Set the row count.
    pub fn row_count(mut self, count: u64) -> Self {
        self.event.row_count = Some(count);
        self
    }

    /// Set the duration in milliseconds.
    pub fn duration_ms(mut self, duration: u64) -> Self {
        self.event.duration_ms = Some(duration);
        self
    }

    /// Set the error message.
    pub fn error(mut self, error: impl Into<String>) -> Self {
        self.event.error = Some(error.into());
        self
    }

    /// Set the correlation ID.
    pub fn correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.event.correlation_id = Some(correlation_id.into());
        self
    }

    /// Set additional metadata.
    pub fn meta(mut self, meta: serde_json::Value) -> Self {
        self.event.meta = meta;
        self
    }

    /// Build the audit event.
    pub fn build(self) -> AuditEvent {
        self.event
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_from_str() {
        assert_eq!(
            "query_rejected".parse::<AuditEventType>(),
            Ok(AuditEventType::QueryRejected)
        );
        assert_eq!(
            "RATE_LIMITED".parse::<AuditEventType>(),
            Ok(AuditEventType::RateLimited)
        );
        assert!("query_planned".parse::<AuditEventType>().is_err());
    }

    #[test]
    fn test_event_builder() {
        let event = AuditEvent::builder(AuditEventType::QueryExecuted, "42")
            .sql("SELECT * FROM assets LIMIT 100")
            .row_count(12)
            .duration_ms(15)
            .build();

        assert_eq!(event.event_type, AuditEventType::QueryExecuted);
        assert_eq!(event.user_id, "42");
        assert_eq!(event.row_count, Some(12));
        assert!(event.error.is_none());
    }

    #[test]
    fn test_to_log_line() {
        let event = AuditEvent::builder(AuditEventType::QueryRejected, "7")
            .sql("SELECT password FROM users")
            .rejection_kind("restricted_column")
            .error("access to column 'password' is not allowed")
            .build();

        let line = event.to_log_line();
        assert!(line.contains("QUERY_REJECTED"));
        assert!(line.contains("user=7"));
        assert!(line.contains("sql=\"SELECT password FROM users\""));
        assert!(line.contains("kind=restricted_column"));
        assert!(line.contains("error=\"access to column 'password' is not allowed\""));
    }

    #[test]
    fn test_log_line_truncates_on_char_boundary() {
        let question = "é".repeat(150);
        let event = AuditEvent::builder(AuditEventType::ChatRequested, "1")
            .question(question)
            .build();

        let line = event.to_log_line();
        assert!(line.contains(&format!("question=\"{}...\"", "é".repeat(100))));
    }

    #[test]
    fn test_serialization_skips_empty_fields() {
        let event = AuditEvent::new(AuditEventType::RateLimited, "9");
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["event_type"], "rate_limited");
        assert_eq!(json["user_id"], "9");
        assert!(json.get("sql").is_none());
        assert!(json.get("meta").is_none());
    }

    #[test]
    fn test_event_type_display() {
        assert_eq!(format!("{}", AuditEventType::ChatRequested), "CHAT_REQUESTED");
        assert_eq!(format!("{}", AuditEventType::QueryFailed), "QUERY_FAILED");
        assert_eq!(format!("{}", AuditEventType::RateLimited), "RATE_LIMITED");
    }
}
