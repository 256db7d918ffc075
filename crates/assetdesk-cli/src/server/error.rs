//! JSON error responses.

use assetdesk_chat::ChatError;
use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

/// An error returned to HTTP clients as `{"success": false, "message": ...}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    reset_in_secs: Option<u64>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            reset_in_secs: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "authentication required")
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        match &err {
            ChatError::EmptyMessage | ChatError::MessageTooLong { .. } => {
                Self::bad_request(err.to_string())
            }
            ChatError::RateLimited { reset_in_secs } => Self {
                status: StatusCode::TOO_MANY_REQUESTS,
                message: err.to_string(),
                reset_in_secs: Some(*reset_in_secs),
            },
            ChatError::NotConfigured => Self::new(StatusCode::SERVICE_UNAVAILABLE, err.to_string()),
            ChatError::Internal(source) => {
                error!(error = %source, "Chat request failed");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "an error occurred while processing the message",
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({
            "success": false,
            "message": self.message,
        });

        let Some(reset_in) = self.reset_in_secs else {
            return (self.status, Json(body)).into_response();
        };

        body["resetIn"] = json!(reset_in);
        let mut response = (self.status, Json(body)).into_response();
        response
            .headers_mut()
            .insert(header::RETRY_AFTER, HeaderValue::from(reset_in));
        response
    }
}
