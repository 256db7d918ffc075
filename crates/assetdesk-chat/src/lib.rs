//! # assetdesk-chat
//!
//! Answers natural-language questions about the asset inventory.
//!
//! [`ChatService`] asks a [`LanguageModel`] for a query, passes it through
//! the [`assetdesk_guard::QueryGuard`], runs it with a [`QueryExecutor`] and
//! has the model phrase the rows. Requests are throttled per user by an
//! injected [`RateLimiter`] and every step is written to the audit trail.

pub mod error;
pub mod executor;
pub mod model;
pub mod prompt;
pub mod rate_limit;
pub mod service;

pub use error::ChatError;
pub use executor::QueryExecutor;
pub use model::{GeneratedQuery, LanguageModel, PromptedModel, ResultType, TextGenerator};
pub use rate_limit::{RateDecision, RateLimiter, SlidingWindowLimiter};
pub use service::{
    ChatReply, ChatResponse, ChatService, ChatStatus, RateLimitStatus, ReplyKind, SUGGESTIONS,
};
