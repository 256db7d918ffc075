//! `assetdesk describe` command implementation.

use super::load_config;
use std::path::Path;

pub fn run(config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    print!("{}", config.schema().describe());
    Ok(())
}
