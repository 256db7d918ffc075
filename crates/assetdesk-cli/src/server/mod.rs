//! HTTP surface of the chat service.
//!
//! Every `/api/chat` route expects the caller's identity in the
//! `x-user-id` header; authentication itself happens upstream.

pub mod error;
pub mod handlers;

use assetdesk_chat::ChatService;
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub struct AppState {
    pub service: ChatService,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/api/chat", post(handlers::chat))
        .route("/api/chat/status", get(handlers::status))
        .route("/api/chat/suggestions", get(handlers::suggestions))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
