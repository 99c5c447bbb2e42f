use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use guestlist_core::RsvpError;

/// HTTP wrapper for engine errors. Validation details go back to the
/// caller; storage internals do not.
pub struct ApiError(pub RsvpError);

impl From<RsvpError> for ApiError {
    fn from(e: RsvpError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self.0 {
            RsvpError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                json!({ "error": message, "field": field }),
            ),
            RsvpError::Duplicate { field } => (
                StatusCode::CONFLICT,
                json!({ "error": format!("{field} already exists"), "field": field }),
            ),
            RsvpError::NotFound => (StatusCode::NOT_FOUND, json!({ "error": "not found" })),
            RsvpError::CapacityExceeded => {
                (StatusCode::CONFLICT, json!({ "error": self.0.to_string() }))
            }
            RsvpError::Storage(e) => {
                error!("storage error: {e:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "internal error" }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

/// Run blocking store work off the async runtime.
pub async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, RsvpError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError(RsvpError::Storage(anyhow::anyhow!("task join error: {e}")))
        })?
        .map_err(ApiError)
}
