use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;
use uuid::Uuid;

use guestlist_types::api::{RsvpResponse, SubmitRsvpRequest, UpdateRsvpRequest};

use crate::AppState;
use crate::error::{ApiError, run_blocking};

pub async fn submit_rsvp(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(req): Json<SubmitRsvpRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let record = run_blocking(move || state.db.submit_rsvp(&slug, &req)).await?;
    info!(
        "rsvp {} for {}: cocktail {}, dinner {}",
        record.id,
        record.event_slug,
        record.booking_status.as_str(),
        record
            .dinner
            .as_ref()
            .map_or("none", |d| d.status.as_str()),
    );
    Ok((StatusCode::CREATED, Json(RsvpResponse::from(record))))
}

/// Host guest list, arrival order, cancelled included.
pub async fn list_rsvps(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let records = run_blocking(move || state.db.list_rsvps(&slug)).await?;
    let rsvps: Vec<RsvpResponse> = records.into_iter().map(RsvpResponse::from).collect();
    Ok(Json(rsvps))
}

pub async fn get_rsvp(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let record = run_blocking(move || state.db.get_rsvp(id)).await?;
    Ok(Json(RsvpResponse::from(record)))
}

/// Partial revision: host status changes, door check-ins, dinner opt-out,
/// guest self-service edits. The response is the full post-update record,
/// cascades included.
pub async fn revise_rsvp(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateRsvpRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let record = run_blocking(move || state.db.update_rsvp(id, &req)).await?;
    Ok(Json(RsvpResponse::from(record)))
}
