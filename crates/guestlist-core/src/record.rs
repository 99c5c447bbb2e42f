//! Record construction and partial-update semantics.
//!
//! Updates are field-level: only supplied fields change, and every write
//! path funnels through `enforce_invariants` so the cross-field rules
//! (status-gated check-ins, saturating clamps, the dinner opt-out cascade)
//! hold no matter which combination of fields a caller touched.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use guestlist_types::api::{SubmitRsvpRequest, UpdateRsvpRequest};
use guestlist_types::models::{BookingStatus, DinnerBooking, DinnerStatus, RsvpRecord};

use crate::booking::BookingDecision;
use crate::error::RsvpError;

/// Build a fresh record from a validated submission and its booking
/// decision. Check-in counters always start at zero.
pub fn new_record(
    req: &SubmitRsvpRequest,
    event_slug: &str,
    decision: BookingDecision,
    now: DateTime<Utc>,
) -> RsvpRecord {
    let mut record = RsvpRecord {
        id: Uuid::new_v4(),
        event_slug: event_slug.to_string(),
        name: req.name.clone(),
        email: req.email.clone(),
        plus_ones: req.plus_ones,
        booking_status: decision.cocktail_status,
        dinner: decision.dinner,
        dinner_pull_up_count: 0,
        cocktail_only_pull_up_count: 0,
        created_at: now,
        updated_at: now,
    };
    enforce_invariants(&mut record);
    record
}

/// Apply a partial update in place. The caller resolves any requested
/// dinner slot to a configured one before calling; this function only
/// handles field merging and cascades.
pub fn apply_update(
    record: &mut RsvpRecord,
    patch: &UpdateRsvpRequest,
    now: DateTime<Utc>,
) -> Result<(), RsvpError> {
    if let Some(name) = &patch.name {
        record.name = name.clone();
    }
    if let Some(plus_ones) = patch.plus_ones {
        record.plus_ones = plus_ones;
    }
    if let Some(status) = patch.booking_status {
        record.booking_status = status;
    }

    if patch.wants_dinner == Some(false) {
        // Opt-out cascade: the booking and its check-in counter go
        // together. The cocktail counter is untouched.
        record.dinner = None;
    } else if let Some(dinner) = &mut record.dinner {
        if let Some(slot_time) = patch.dinner_time_slot {
            dinner.slot_time = slot_time;
        }
        if let Some(party_size) = patch.dinner_party_size {
            dinner.party_size = party_size;
        }
        if let Some(status) = patch.dinner_status {
            dinner.status = status;
        }
    } else if patch.wants_dinner == Some(true)
        || patch.dinner_time_slot.is_some()
        || patch.dinner_party_size.is_some()
    {
        let Some(slot_time) = patch.dinner_time_slot else {
            return Err(RsvpError::validation(
                "dinner_time_slot",
                "required to add a dinner booking",
            ));
        };
        let Some(party_size) = patch.dinner_party_size else {
            return Err(RsvpError::validation(
                "dinner_party_size",
                "required to add a dinner booking",
            ));
        };
        record.dinner = Some(DinnerBooking {
            slot_time,
            party_size,
            status: patch.dinner_status.unwrap_or(DinnerStatus::Confirmed),
        });
    }

    if let Some(count) = patch.dinner_pull_up_count {
        record.dinner_pull_up_count = count;
    }
    if let Some(count) = patch.cocktail_only_pull_up_count {
        record.cocktail_only_pull_up_count = count;
    }

    record.updated_at = now;
    enforce_invariants(record);
    Ok(())
}

/// Re-assert every cross-field invariant on a record, clamping rather than
/// rejecting. Idempotent.
pub fn enforce_invariants(record: &mut RsvpRecord) {
    // The dinner party can never exceed the party itself.
    if let Some(dinner) = &mut record.dinner {
        let party_size = 1 + record.plus_ones;
        if dinner.party_size > party_size {
            dinner.party_size = party_size;
        }
    }

    // A guest who is not confirmed cannot have arrived.
    if record.booking_status != BookingStatus::Confirmed {
        record.dinner_pull_up_count = 0;
        record.cocktail_only_pull_up_count = 0;
    }
    if !record.dinner_confirmed() {
        record.dinner_pull_up_count = 0;
    }

    // Saturate at the track bounds; over-taps are a no-op, not an error.
    record.dinner_pull_up_count = record.dinner_pull_up_count.min(record.dinner_party_size());
    record.cocktail_only_pull_up_count = record
        .cocktail_only_pull_up_count
        .min(record.cocktail_only_party_size());
}
