//! The chat pipeline.
//!
//! A question flows through the language model, the query guard, the
//! database and back through the model for phrasing. Every step that can
//! fail after the request is admitted still produces a reply the user can
//! read; only input validation, throttling, a missing model and internal
//! faults surface as [`ChatError`].

use crate::error::ChatError;
use crate::executor::QueryExecutor;
use crate::model::{GeneratedQuery, LanguageModel};
use crate::rate_limit::RateLimiter;
use assetdesk_audit::{AuditError, AuditLogger};
use assetdesk_core::ChatConfig;
use assetdesk_guard::QueryGuard;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use uuid::Uuid;

/// Example questions offered to new users.
pub const SUGGESTIONS: [&str; 10] = [
    "How many assets are there in total?",
    "Which assets are currently under repair?",
    "What is the total value of assets in the Laptop category?",
    "List the available assets in Building A",
    "Which users are currently borrowing assets?",
    "Which assets have a warranty expiring this month?",
    "How many assets are there per category?",
    "Which vendor has supplied the most assets?",
    "List the assets in 'poor' condition",
    "Show this week's asset transactions",
];

const DATABASE_ERROR_MESSAGE: &str =
    "Sorry, something went wrong while fetching the data. Please try a different question.";

/// How a reply was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyKind {
    /// Answered from query results.
    Database,
    /// Answered without the database.
    General,
    /// The question could not be answered safely.
    Error,
}

/// A reply to one chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    #[serde(rename = "type")]
    pub kind: ReplyKind,
    pub message: String,
    /// The query that ran, for database replies.
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    /// Why the model declined to query the database.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ChatReply {
    fn general(message: String, reason: Option<String>) -> Self {
        Self {
            kind: ReplyKind::General,
            message,
            query: None,
            result_count: None,
            explanation: None,
            reason,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ReplyKind::Error,
            message: message.into(),
            query: None,
            result_count: None,
            explanation: None,
            reason: None,
        }
    }
}

/// A reply plus the caller's remaining quota.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatResponse {
    pub data: ChatReply,
    pub remaining: u32,
}

/// Quota snapshot reported by [`ChatService::status`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitStatus {
    pub remaining: u32,
    pub max_requests: u32,
    pub window_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatStatus {
    pub configured: bool,
    pub rate_limit: RateLimitStatus,
}

/// Orchestrates a chat request end to end.
pub struct ChatService {
    guard: Arc<QueryGuard>,
    model: Option<Arc<dyn LanguageModel>>,
    executor: Arc<dyn QueryExecutor>,
    limiter: Arc<dyn RateLimiter>,
    audit: Arc<AuditLogger>,
    config: ChatConfig,
    schema_description: String,
}

impl ChatService {
    pub fn new(
        guard: Arc<QueryGuard>,
        model: Option<Arc<dyn LanguageModel>>,
        executor: Arc<dyn QueryExecutor>,
        limiter: Arc<dyn RateLimiter>,
        audit: Arc<AuditLogger>,
        config: ChatConfig,
    ) -> Self {
        let schema_description = guard.schema().describe();
        Self {
            guard,
            model,
            executor,
            limiter,
            audit,
            config,
            schema_description,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.model.is_some()
    }

    /// Answer a message from `user_id`.
    pub async fn chat(&self, user_id: &str, message: &str) -> Result<ChatResponse, ChatError> {
        if message.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if message.chars().count() > self.config.max_message_chars {
            return Err(ChatError::MessageTooLong {
                max: self.config.max_message_chars,
            });
        }

        let decision = self.limiter.check(user_id).await;
        if !decision.allowed {
            record(self.audit.log_rate_limited(user_id, decision.reset_in_secs).await);
            return Err(ChatError::RateLimited {
                reset_in_secs: decision.reset_in_secs,
            });
        }

        let Some(model) = self.model.as_deref() else {
            return Err(ChatError::NotConfigured);
        };

        let correlation_id = Uuid::new_v4().to_string();
        record(
            self.audit
                .log_chat_requested(user_id, &correlation_id, message)
                .await,
        );

        let request = Request {
            user_id,
            correlation_id: &correlation_id,
            message,
            model,
        };
        let data = self.answer(&request).await?;

        Ok(ChatResponse {
            data,
            remaining: decision.remaining,
        })
    }

    async fn answer(&self, req: &Request<'_>) -> Result<ChatReply, ChatError> {
        let generated = self
            .with_timeout(
                self.llm_timeout(),
                req.model.generate_sql(req.message, &self.schema_description),
            )
            .await;

        let generated = match generated {
            Ok(generated) => generated,
            Err(e) => {
                warn!(error = %e, "Query generation failed, falling back to general chat");
                let message = self.general_chat(req).await?;
                return Ok(ChatReply::general(message, None));
            }
        };

        if !generated.can_answer {
            let message = self.general_chat(req).await?;
            return Ok(ChatReply::general(message, Some(generated.explanation)));
        }

        let candidate = generated.sql_query.as_deref().unwrap_or_default();
        let sanitized = match self.guard.process(candidate) {
            Ok(sanitized) => sanitized,
            Err(rejection) => {
                record(
                    self.audit
                        .log_query_rejected(
                            req.user_id,
                            req.correlation_id,
                            candidate,
                            &rejection.kind.to_string(),
                            &rejection.reason,
                        )
                        .await,
                );
                return Ok(ChatReply::error(format!(
                    "Sorry, I can't process that request. {}",
                    rejection.reason
                )));
            }
        };
        record(
            self.audit
                .log_query_accepted(req.user_id, req.correlation_id, sanitized.as_str())
                .await,
        );

        let started = Instant::now();
        let rows = match self
            .with_timeout(self.query_timeout(), self.executor.fetch_rows(&sanitized))
            .await
        {
            Ok(rows) => rows,
            Err(e) => {
                warn!(error = %e, sql = %sanitized, "Query execution failed");
                record(
                    self.audit
                        .log_query_failed(
                            req.user_id,
                            req.correlation_id,
                            sanitized.as_str(),
                            &e.to_string(),
                        )
                        .await,
                );
                return Ok(ChatReply::error(DATABASE_ERROR_MESSAGE));
            }
        };
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        record(
            self.audit
                .log_query_executed(
                    req.user_id,
                    req.correlation_id,
                    sanitized.as_str(),
                    rows.len() as u64,
                    elapsed_ms,
                )
                .await,
        );
        info!(rows = rows.len(), duration_ms = elapsed_ms, "Answered from database");

        let message = self.format_rows(req, &generated, &rows).await;

        Ok(ChatReply {
            kind: ReplyKind::Database,
            message,
            query: Some(sanitized.into_string()),
            result_count: Some(rows.len()),
            explanation: Some(generated.explanation),
            reason: None,
        })
    }

    async fn general_chat(&self, req: &Request<'_>) -> Result<String, ChatError> {
        self.with_timeout(self.llm_timeout(), req.model.general_chat(req.message))
            .await
            .map_err(ChatError::Internal)
    }

    /// Phrase the rows through the model, or fall back to the raw JSON.
    async fn format_rows(
        &self,
        req: &Request<'_>,
        generated: &GeneratedQuery,
        rows: &[serde_json::Value],
    ) -> String {
        let formatted = self
            .with_timeout(
                self.llm_timeout(),
                req.model.format_response(req.message, generated, rows),
            )
            .await;

        match formatted {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, "Formatting failed, returning raw rows");
                let raw = serde_json::to_string_pretty(rows).unwrap_or_else(|_| "[]".to_string());
                format!("Here are the query results:\n{}", raw)
            }
        }
    }

    /// Report configuration and quota without counting a request.
    pub async fn status(&self, user_id: &str) -> ChatStatus {
        let decision = self.limiter.peek(user_id).await;
        ChatStatus {
            configured: self.is_configured(),
            rate_limit: RateLimitStatus {
                remaining: decision.remaining,
                max_requests: self.limiter.max_requests(),
                window_secs: self.limiter.window().as_secs(),
            },
        }
    }

    pub fn suggestions(&self) -> &'static [&'static str] {
        &SUGGESTIONS
    }

    fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.config.llm_timeout_secs)
    }

    fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.config.query_timeout_secs)
    }

    async fn with_timeout<T>(
        &self,
        limit: Duration,
        fut: impl Future<Output = anyhow::Result<T>>,
    ) -> anyhow::Result<T> {
        match tokio::time::timeout(limit, fut).await {
            Ok(result) => result,
            Err(_) => Err(anyhow::anyhow!("timed out after {}s", limit.as_secs())),
        }
    }
}

struct Request<'a> {
    user_id: &'a str,
    correlation_id: &'a str,
    message: &'a str,
    model: &'a dyn LanguageModel,
}

/// Audit failures never fail a request.
fn record(result: Result<(), AuditError>) {
    if let Err(e) = result {
        warn!(error = %e, "Failed to write audit event");
    }
}
