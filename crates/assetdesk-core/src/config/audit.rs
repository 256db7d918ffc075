//! Audit logging configuration.

use serde::{Deserialize, Serialize};

/// Configuration for audit logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Whether audit logging is enabled.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Also print human-readable lines to stdout.
    #[serde(default)]
    pub stdout: bool,

    /// Directory holding `audit.log` (JSON Lines).
    #[serde(default = "default_directory")]
    pub directory: String,

    /// Whether the candidate SQL of rejected queries is recorded.
    #[serde(default = "default_enabled")]
    pub log_rejected_sql: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            stdout: false,
            directory: default_directory(),
            log_rejected_sql: default_enabled(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_directory() -> String {
    "logs".to_string()
}
