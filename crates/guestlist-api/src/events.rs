use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use guestlist_core::slots;
use guestlist_types::api::{CreateEventRequest, SlotListResponse};

use crate::AppState;
use crate::error::{ApiError, run_blocking};

pub async fn create_event(
    State(state): State<AppState>,
    Json(req): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let config = run_blocking(move || state.db.create_event(&req)).await?;
    info!("event created: {}", config.slug);
    Ok((StatusCode::CREATED, Json(config)))
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let config = run_blocking(move || state.db.get_event(&slug)).await?;
    Ok(Json(config))
}

/// Dinner seating times for the guest form. Derived from the event
/// configuration alone, so this never touches the rsvps table.
pub async fn get_slots(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let config = run_blocking(move || state.db.get_event(&slug)).await?;
    Ok(Json(SlotListResponse {
        slots: slots::dinner_slots(&config),
    }))
}
