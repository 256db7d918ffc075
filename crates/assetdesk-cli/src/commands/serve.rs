//! `assetdesk serve` command implementation.
//!
//! Wires the guard, Postgres executor, rate limiter and audit logger into a
//! [`ChatService`] and serves it over HTTP until Ctrl-C.

use super::load_config;
use crate::server::{AppState, router};
use anyhow::Context;
use assetdesk_adapter_pg::PostgresExecutor;
use assetdesk_audit::AuditLogger;
use assetdesk_chat::{ChatService, SlidingWindowLimiter};
use assetdesk_guard::QueryGuard;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

pub async fn run(config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let guard = QueryGuard::new(Arc::new(config.schema()))?.with_mode(config.guard.mode);
    let executor = PostgresExecutor::from_config(&config.database)
        .await
        .context("failed to connect to the database")?;
    let limiter = SlidingWindowLimiter::from_config(&config.chat.rate_limit);
    let audit = AuditLogger::new(config.audit.clone())?;

    // No text generation backend ships with the binary; chat answers 503
    // until one is provided through `LanguageModel`.
    warn!("No language model configured, POST /api/chat will return 503");

    let service = ChatService::new(
        Arc::new(guard),
        None,
        Arc::new(executor),
        Arc::new(limiter),
        Arc::new(audit),
        config.chat.clone(),
    );
    let app = router(Arc::new(AppState { service }));

    let listener = TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind))?;
    info!(
        bind = %config.server.bind,
        guard_mode = ?config.guard.mode,
        "AssetDesk server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("AssetDesk server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
