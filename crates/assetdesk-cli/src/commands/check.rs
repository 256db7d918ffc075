//! `assetdesk check` command implementation.
//!
//! Runs a candidate statement through the same guard the chat server uses
//! and prints the decision as JSON.

use super::load_config;
use assetdesk_core::{AssetDeskConfig, GuardMode};
use assetdesk_guard::{GuardResult, QueryGuard};
use std::path::Path;
use std::sync::Arc;

pub fn run(sql: &str, strict: bool, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let result = evaluate(sql, strict, &config)?;

    println!("{}", serde_json::to_string_pretty(&result)?);

    if !result.ok {
        anyhow::bail!("query rejected");
    }
    Ok(())
}

/// `--strict` overrides the configured mode; it never relaxes it.
fn evaluate(sql: &str, strict: bool, config: &AssetDeskConfig) -> anyhow::Result<GuardResult> {
    let mode = if strict {
        GuardMode::Strict
    } else {
        config.guard.mode
    };
    let guard = QueryGuard::new(Arc::new(config.schema()))?.with_mode(mode);
    Ok(guard.process(sql).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assetdesk_guard::RejectionKind;

    #[test]
    fn test_accepts_and_caps_limit() {
        let result = evaluate(
            "SELECT name FROM assets LIMIT 500",
            false,
            &AssetDeskConfig::default(),
        )
        .unwrap();

        assert!(result.ok);
        assert_eq!(
            result.sanitized_query.as_deref(),
            Some("SELECT name FROM assets LIMIT 100")
        );
    }

    #[test]
    fn test_rejects_restricted_column() {
        let result = evaluate(
            "SELECT password FROM users",
            false,
            &AssetDeskConfig::default(),
        )
        .unwrap();

        assert!(!result.ok);
        assert_eq!(result.kind, Some(RejectionKind::RestrictedColumn));
    }

    #[test]
    fn test_strict_flag_catches_comma_join() {
        let sql = "SELECT a.name FROM assets a, secrets s";
        let config = AssetDeskConfig::default();

        assert!(evaluate(sql, false, &config).unwrap().ok);

        let strict = evaluate(sql, true, &config).unwrap();
        assert!(!strict.ok);
        assert_eq!(strict.kind, Some(RejectionKind::DisallowedTable));
    }

    #[test]
    fn test_run_fails_on_rejection() {
        let err = run("DROP TABLE assets", false, None).unwrap_err();
        assert!(err.to_string().contains("rejected"));
    }
}
