//! Query guard configuration.

use serde::{Deserialize, Serialize};

/// How candidate SQL is checked.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GuardMode {
    /// Pattern-based validation only.
    #[default]
    Textual,
    /// Pattern-based validation followed by a structural check of the
    /// parsed statement.
    Strict,
}

/// Settings for the query guard.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GuardConfig {
    #[serde(default)]
    pub mode: GuardMode,
}
