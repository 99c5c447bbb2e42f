use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{BookingStatus, DinnerBooking, DinnerStatus, RsvpRecord};

// -- Events --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateEventRequest {
    pub slug: String,
    pub name: String,
    pub cocktail_capacity: Option<u32>,
    pub food_capacity: Option<u32>,
    pub total_capacity: Option<u32>,
    #[serde(default = "default_true")]
    pub waitlist_enabled: bool,
    #[serde(default = "default_max_plus_ones")]
    pub max_plus_ones_per_guest: u32,
    #[serde(default)]
    pub dinner_enabled: bool,
    pub dinner_start: Option<DateTime<Utc>>,
    pub dinner_end: Option<DateTime<Utc>>,
    #[serde(default = "default_seating_interval")]
    pub dinner_seating_interval_hours: f64,
    pub dinner_max_seats_per_slot: Option<u32>,
}

fn default_true() -> bool {
    true
}

fn default_max_plus_ones() -> u32 {
    10
}

fn default_seating_interval() -> f64 {
    1.0
}

// -- RSVPs --

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubmitRsvpRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub plus_ones: u32,
    #[serde(default)]
    pub wants_dinner: bool,
    pub dinner_time_slot: Option<DateTime<Utc>>,
    pub dinner_party_size: Option<u32>,
}

/// Partial update: only supplied fields change. Cascades (dinner opt-out,
/// status-gated check-in resets) are applied by the engine, and the full
/// post-update record is returned so callers see every effect.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateRsvpRequest {
    pub name: Option<String>,
    pub plus_ones: Option<u32>,
    pub booking_status: Option<BookingStatus>,
    pub wants_dinner: Option<bool>,
    pub dinner_time_slot: Option<DateTime<Utc>>,
    pub dinner_party_size: Option<u32>,
    pub dinner_status: Option<DinnerStatus>,
    pub dinner_pull_up_count: Option<u32>,
    pub cocktail_only_pull_up_count: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct RsvpResponse {
    pub id: Uuid,
    pub event_slug: String,
    pub name: String,
    pub email: String,
    pub plus_ones: u32,
    pub party_size: u32,
    pub booking_status: BookingStatus,
    pub dinner: Option<DinnerBooking>,
    pub cocktail_only_party_size: u32,
    pub dinner_pull_up_count: u32,
    pub cocktail_only_pull_up_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RsvpRecord> for RsvpResponse {
    fn from(r: RsvpRecord) -> Self {
        let party_size = r.party_size();
        let cocktail_only_party_size = r.cocktail_only_party_size();
        Self {
            id: r.id,
            event_slug: r.event_slug,
            name: r.name,
            email: r.email,
            plus_ones: r.plus_ones,
            party_size,
            booking_status: r.booking_status,
            dinner: r.dinner,
            cocktail_only_party_size,
            dinner_pull_up_count: r.dinner_pull_up_count,
            cocktail_only_pull_up_count: r.cocktail_only_pull_up_count,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

// -- Dinner slots --

#[derive(Debug, Serialize)]
pub struct SlotListResponse {
    pub slots: Vec<DateTime<Utc>>,
}

// -- Live stats --

/// Occupancy of one dinner seating slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotStats {
    pub time: DateTime<Utc>,
    pub confirmed: u32,
    pub pulled_up: u32,
    /// Seats left under `dinner_max_seats_per_slot`; absent when the slot
    /// is uncapped.
    pub remaining_seats: Option<u32>,
    pub over_capacity: bool,
}

/// Live dashboard numbers, recomputed from the full record set on every
/// request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventStats {
    pub attending: u32,
    pub waitlist: u32,
    pub cocktail_only: u32,
    pub dinner_confirmed: u32,
    pub dinner_waitlist: u32,
    pub cocktails_pulled_up: u32,
    pub dinner_pulled_up: u32,
    pub pulled_up_total: u32,
    pub total_over_capacity: u32,
    pub cocktail_over_capacity: u32,
    pub slots: Vec<SlotStats>,
}
