//! Error types for chat orchestration.

use thiserror::Error;

/// Failures that end a chat request without a reply.
///
/// Guard rejections and database errors are not here: those still produce
/// a reply the user can read.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("message must not be empty")]
    EmptyMessage,

    #[error("message is too long (maximum {max} characters)")]
    MessageTooLong { max: usize },

    #[error("too many requests, try again in {reset_in_secs} seconds")]
    RateLimited { reset_in_secs: u64 },

    #[error("the AI service is not configured")]
    NotConfigured,

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
