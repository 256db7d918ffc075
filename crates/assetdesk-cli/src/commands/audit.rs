//! `assetdesk audit` command implementation.
//!
//! Reads the JSON Lines audit trail written by `assetdesk serve`.

use super::load_config;
use assetdesk_audit::{AuditEvent, AuditEventType, AuditFilter, AuditLogger, FileStorage};
use assetdesk_core::AuditConfig;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

/// Which events to show.
#[derive(Debug, Clone, Default)]
pub struct AuditQuery {
    pub id: Option<Uuid>,
    pub user: Option<String>,
    pub event_type: Option<AuditEventType>,
    pub correlation_id: Option<String>,
    pub limit: usize,
}

pub async fn run(query: AuditQuery, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let logger = reader(&config.audit)?;

    if let Some(id) = query.id {
        let Some(event) = logger.get(id).await? else {
            anyhow::bail!("no audit event with id {}", id);
        };
        println!("{}", serde_json::to_string_pretty(&event)?);
        return Ok(());
    }

    let (events, total) = recent(&logger, &query).await?;
    for event in &events {
        println!("{}", serde_json::to_string(event)?);
    }
    eprintln!("{} of {} matching events", events.len(), total);
    Ok(())
}

/// Logger over the configured audit file, without console output.
fn reader(config: &AuditConfig) -> anyhow::Result<AuditLogger> {
    let storage = FileStorage::new(AuditLogger::log_path(config))?;
    Ok(AuditLogger::with_storage(config.clone(), Arc::new(storage)))
}

/// Matching events, newest first, and how many match in total.
async fn recent(
    logger: &AuditLogger,
    query: &AuditQuery,
) -> anyhow::Result<(Vec<AuditEvent>, usize)> {
    let filter = AuditFilter {
        user_id: query.user.clone(),
        event_type: query.event_type,
        correlation_id: query.correlation_id.clone(),
        limit: Some(query.limit),
        newest_first: true,
        ..Default::default()
    };

    let total = logger.count(filter.clone()).await?;
    let events = logger.query(filter).await?;
    Ok((events, total))
}
