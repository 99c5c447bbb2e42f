use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status of the general (cocktail) reservation track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Waitlist,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Waitlist => "waitlist",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "confirmed" => Some(BookingStatus::Confirmed),
            "waitlist" => Some(BookingStatus::Waitlist),
            "cancelled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }
}

/// Status of the dinner track. Dinner bookings are never "cancelled" —
/// opting out of dinner removes the booking entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DinnerStatus {
    Confirmed,
    Waitlist,
}

impl DinnerStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DinnerStatus::Confirmed => "confirmed",
            DinnerStatus::Waitlist => "waitlist",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "confirmed" => Some(DinnerStatus::Confirmed),
            "waitlist" => Some(DinnerStatus::Waitlist),
            _ => None,
        }
    }
}

/// The dinner portion of a reservation. Present only when the guest opted
/// into dinner; clearing it (dinner opt-out) also zeroes the dinner
/// check-in counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DinnerBooking {
    pub slot_time: DateTime<Utc>,
    pub party_size: u32,
    pub status: DinnerStatus,
}

/// One accepted guest submission. Records are never deleted; cancellation
/// is a status change so historical stats stay consistent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RsvpRecord {
    pub id: Uuid,
    pub event_slug: String,
    pub name: String,
    pub email: String,
    /// Additional guests besides the booker.
    pub plus_ones: u32,
    pub booking_status: BookingStatus,
    pub dinner: Option<DinnerBooking>,
    /// Guests from the dinner party checked in at the door.
    pub dinner_pull_up_count: u32,
    /// Guests from the non-dinner portion of the party checked in.
    pub cocktail_only_pull_up_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RsvpRecord {
    /// Booker plus their plus-ones.
    pub fn party_size(&self) -> u32 {
        1 + self.plus_ones
    }

    /// Party size of the dinner booking, or 0 without one.
    pub fn dinner_party_size(&self) -> u32 {
        self.dinner.as_ref().map_or(0, |d| d.party_size)
    }

    pub fn dinner_confirmed(&self) -> bool {
        self.dinner
            .as_ref()
            .is_some_and(|d| d.status == DinnerStatus::Confirmed)
    }

    /// Portion of the party not seated at a confirmed dinner. When the
    /// guest has no confirmed dinner portion the whole party is
    /// cocktail-only.
    pub fn cocktail_only_party_size(&self) -> u32 {
        if self.booking_status == BookingStatus::Confirmed && self.dinner_confirmed() {
            self.party_size().saturating_sub(self.dinner_party_size())
        } else {
            self.party_size()
        }
    }
}

/// Per-event capacity and dinner-seating policy. Read-only from the
/// engine's point of view: every booking decision sees one immutable
/// snapshot of this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventConfig {
    pub slug: String,
    pub name: String,
    pub cocktail_capacity: Option<u32>,
    pub food_capacity: Option<u32>,
    pub total_capacity: Option<u32>,
    pub waitlist_enabled: bool,
    pub max_plus_ones_per_guest: u32,
    pub dinner_enabled: bool,
    pub dinner_start: Option<DateTime<Utc>>,
    pub dinner_end: Option<DateTime<Utc>>,
    /// Spacing between dinner seatings, in hours (0.5–24).
    pub dinner_seating_interval_hours: f64,
    pub dinner_max_seats_per_slot: Option<u32>,
    pub created_at: DateTime<Utc>,
}
