//! CLI command implementations for AssetDesk.

pub mod audit;
pub mod check;
pub mod describe;
pub mod serve;

use anyhow::Context;
use assetdesk_core::AssetDeskConfig;
use std::path::Path;

/// Load the configuration file, or fall back to defaults when none is given.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<AssetDeskConfig> {
    match path {
        Some(path) => AssetDeskConfig::load_with_context(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(AssetDeskConfig::default()),
    }
}
