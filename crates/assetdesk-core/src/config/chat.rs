//! Chat orchestration configuration.

use serde::{Deserialize, Serialize};

/// Settings for the chat endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Longest accepted question, in characters.
    #[serde(default = "default_max_message_chars")]
    pub max_message_chars: usize,

    /// Upper bound for a single language model call.
    #[serde(default = "default_llm_timeout_secs")]
    pub llm_timeout_secs: u64,

    /// Upper bound for executing a sanitized query.
    #[serde(default = "default_query_timeout_secs")]
    pub query_timeout_secs: u64,

    /// Per-user request throttle.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_message_chars: default_max_message_chars(),
            llm_timeout_secs: default_llm_timeout_secs(),
            query_timeout_secs: default_query_timeout_secs(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

/// Sliding window request limit per user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Requests allowed inside one window.
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    /// Window length in seconds.
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
        }
    }
}

fn default_max_message_chars() -> usize {
    1000
}

fn default_llm_timeout_secs() -> u64 {
    30
}

fn default_query_timeout_secs() -> u64 {
    10
}

fn default_max_requests() -> u32 {
    15
}

fn default_window_secs() -> u64 {
    60
}
