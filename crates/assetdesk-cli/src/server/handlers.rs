use super::AppState;
use super::error::ApiError;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequestParts, State};
use axum::http::request::Parts;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

/// Header carrying the caller's identity, set by the upstream auth layer.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated caller.
#[derive(Debug, Clone)]
pub struct UserId(pub String);

impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| UserId(v.to_string()))
            .ok_or_else(ApiError::unauthorized)
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

pub async fn healthz() -> Json<Value> {
    Json(json!({"ok": true, "service": "assetdesk"}))
}

pub async fn chat(
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let response = state.service.chat(&user_id, &request.message).await?;

    Ok(Json(json!({
        "success": true,
        "data": response.data,
        "remaining": response.remaining,
    })))
}

pub async fn status(
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
) -> Json<Value> {
    let status = state.service.status(&user_id).await;
    Json(json!({"success": true, "data": status}))
}

pub async fn suggestions(State(state): State<Arc<AppState>>, _user: UserId) -> Json<Value> {
    Json(json!({"success": true, "data": state.service.suggestions()}))
}
