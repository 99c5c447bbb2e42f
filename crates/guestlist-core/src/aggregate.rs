//! Live dashboard statistics.
//!
//! A pure projection over the full record set, recomputed on every call.
//! It runs read-only and concurrently with bookings; it is a dashboard,
//! not a capacity gate, so it never needs a transactional snapshot.

use guestlist_types::api::{EventStats, SlotStats};
use guestlist_types::models::{BookingStatus, DinnerStatus, EventConfig, RsvpRecord};

use crate::slots::dinner_slots;

pub fn event_stats(config: &EventConfig, records: &[RsvpRecord]) -> EventStats {
    let mut stats = EventStats::default();

    for r in records {
        match r.booking_status {
            BookingStatus::Waitlist => stats.waitlist += r.party_size(),
            BookingStatus::Confirmed => {
                stats.attending += r.party_size();
                // With a confirmed dinner portion, only the plus-ones count
                // as cocktail-only; otherwise the whole party does.
                stats.cocktail_only += if r.dinner_confirmed() {
                    r.plus_ones
                } else {
                    r.party_size()
                };
            }
            BookingStatus::Cancelled => {}
        }

        if let Some(dinner) = &r.dinner {
            match dinner.status {
                DinnerStatus::Confirmed => stats.dinner_confirmed += dinner.party_size,
                DinnerStatus::Waitlist => stats.dinner_waitlist += dinner.party_size,
            }
        }

        stats.cocktails_pulled_up += r.cocktail_only_pull_up_count;
        stats.dinner_pulled_up += r.dinner_pull_up_count;
    }
    stats.pulled_up_total = stats.cocktails_pulled_up + stats.dinner_pulled_up;

    if let Some(capacity) = config.total_capacity {
        stats.total_over_capacity = stats.attending.saturating_sub(capacity);
    }
    if let Some(capacity) = config.cocktail_capacity {
        stats.cocktail_over_capacity = stats.cocktail_only.saturating_sub(capacity);
    }

    stats.slots = dinner_slots(config)
        .into_iter()
        .map(|time| {
            let mut confirmed = 0;
            let mut pulled_up = 0;
            for r in records {
                let Some(dinner) = &r.dinner else { continue };
                if dinner.status == DinnerStatus::Confirmed && dinner.slot_time == time {
                    confirmed += dinner.party_size;
                    pulled_up += r.dinner_pull_up_count;
                }
            }
            SlotStats {
                time,
                confirmed,
                pulled_up,
                remaining_seats: config
                    .dinner_max_seats_per_slot
                    .map(|max| max.saturating_sub(confirmed)),
                over_capacity: config
                    .dinner_max_seats_per_slot
                    .is_some_and(|max| confirmed > max),
            }
        })
        .collect();

    stats
}
