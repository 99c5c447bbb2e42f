//! The booking decision: given the event's capacity policy and every
//! record already on the books, place an incoming party on the cocktail
//! track and (optionally) a dinner slot.
//!
//! Decisions are first-come-first-served over the confirmed records at the
//! moment of submission. Nothing here promotes waitlisted guests when
//! capacity later frees up; that is a deliberate host action.

use chrono::{DateTime, Utc};
use guestlist_types::models::{
    BookingStatus, DinnerBooking, DinnerStatus, EventConfig, RsvpRecord,
};

use crate::error::RsvpError;

/// A validated guest submission, reduced to what the decision needs.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub party_size: u32,
    pub dinner: Option<DinnerRequest>,
}

/// Dinner portion of a request. `slot_time` must already be resolved to a
/// configured slot (see `slots::resolve_slot`).
#[derive(Debug, Clone)]
pub struct DinnerRequest {
    pub slot_time: DateTime<Utc>,
    pub party_size: u32,
}

/// Outcome of a booking decision. `cocktail_status` is never `Cancelled`;
/// the two tracks are decided independently, so a cocktail-confirmed guest
/// can simultaneously be dinner-waitlisted.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingDecision {
    pub cocktail_status: BookingStatus,
    pub dinner: Option<DinnerBooking>,
}

/// Total confirmed headcount on the cocktail track.
pub fn confirmed_attendance(records: &[RsvpRecord]) -> u32 {
    records
        .iter()
        .filter(|r| r.booking_status == BookingStatus::Confirmed)
        .map(RsvpRecord::party_size)
        .sum()
}

/// Confirmed dinner seats already taken at one slot.
pub fn slot_occupancy(records: &[RsvpRecord], slot_time: DateTime<Utc>) -> u32 {
    records
        .iter()
        .filter_map(|r| r.dinner.as_ref())
        .filter(|d| d.status == DinnerStatus::Confirmed && d.slot_time == slot_time)
        .map(|d| d.party_size)
        .sum()
}

pub fn decide(
    config: &EventConfig,
    records: &[RsvpRecord],
    request: &BookingRequest,
) -> Result<BookingDecision, RsvpError> {
    let cocktail_status = match config.cocktail_capacity {
        Some(capacity) if confirmed_attendance(records) + request.party_size > capacity => {
            if config.waitlist_enabled {
                BookingStatus::Waitlist
            } else {
                // Hard-closed: no record is created at all.
                return Err(RsvpError::CapacityExceeded);
            }
        }
        _ => BookingStatus::Confirmed,
    };

    let dinner = match &request.dinner {
        Some(d) if config.dinner_enabled => {
            // The dinner party can never exceed the party itself.
            let party_size = d.party_size.min(request.party_size);
            let status = match config.dinner_max_seats_per_slot {
                Some(max_seats)
                    if slot_occupancy(records, d.slot_time) + party_size > max_seats =>
                {
                    DinnerStatus::Waitlist
                }
                _ => DinnerStatus::Confirmed,
            };
            Some(DinnerBooking {
                slot_time: d.slot_time,
                party_size,
                status,
            })
        }
        _ => None,
    };

    Ok(BookingDecision {
        cocktail_status,
        dinner,
    })
}
