use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::AppState;
use crate::error::{ApiError, run_blocking};

/// Live dashboard numbers, recomputed from the full record set on each
/// call. Reads run concurrently with bookings; the dashboard tolerates
/// that, a capacity decision would not.
pub async fn event_stats(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let stats = run_blocking(move || state.db.event_stats(&slug)).await?;
    Ok(Json(stats))
}
