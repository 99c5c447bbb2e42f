//! Boundary validation for guest and host input.
//!
//! Field ranges live here in one place; the engine itself only re-asserts
//! cross-field invariants (capacity, cascades, clamps).

use guestlist_types::api::{CreateEventRequest, SubmitRsvpRequest, UpdateRsvpRequest};
use guestlist_types::models::EventConfig;

use crate::error::RsvpError;

pub const MAX_EMAIL_LEN: usize = 255;
pub const MAX_NAME_LEN: usize = 255;
pub const MAX_PLUS_ONES: u32 = 10;
pub const MAX_DINNER_PARTY: u32 = 20;
pub const MIN_SEATING_INTERVAL_HOURS: f64 = 0.5;
pub const MAX_SEATING_INTERVAL_HOURS: f64 = 24.0;
/// Longest dinner window a host may configure. Keeps the generated slot
/// list (rebuilt on every stats call) to a few hundred entries even at
/// the half-hour interval.
pub const MAX_DINNER_WINDOW_DAYS: i64 = 14;

/// Minimal structural check: `local@domain` with a dot somewhere in the
/// domain. Anything stricter belongs to a confirmation email, not a regex.
pub fn is_valid_email(email: &str) -> bool {
    if email.len() > MAX_EMAIL_LEN {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
}

pub fn validate_event(req: &CreateEventRequest) -> Result<(), RsvpError> {
    if req.slug.is_empty()
        || req.slug.len() > 64
        || !req
            .slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(RsvpError::validation(
            "slug",
            "must be 1-64 chars of a-z, 0-9, or '-'",
        ));
    }
    if req.name.is_empty() || req.name.len() > MAX_NAME_LEN {
        return Err(RsvpError::validation("name", "must be 1-255 chars"));
    }
    if req.dinner_enabled {
        let (Some(start), Some(end)) = (req.dinner_start, req.dinner_end) else {
            return Err(RsvpError::validation(
                "dinner_start",
                "dinner window required when dinner is enabled",
            ));
        };
        if start > end {
            return Err(RsvpError::validation(
                "dinner_end",
                "must not be before dinner_start",
            ));
        }
        if end - start > chrono::Duration::days(MAX_DINNER_WINDOW_DAYS) {
            return Err(RsvpError::validation(
                "dinner_end",
                format!("dinner window may span at most {MAX_DINNER_WINDOW_DAYS} days"),
            ));
        }
        if !(MIN_SEATING_INTERVAL_HOURS..=MAX_SEATING_INTERVAL_HOURS)
            .contains(&req.dinner_seating_interval_hours)
        {
            return Err(RsvpError::validation(
                "dinner_seating_interval_hours",
                "must be between 0.5 and 24",
            ));
        }
    }
    Ok(())
}

pub fn validate_submission(
    config: &EventConfig,
    req: &SubmitRsvpRequest,
) -> Result<(), RsvpError> {
    if req.name.is_empty() || req.name.len() > MAX_NAME_LEN {
        return Err(RsvpError::validation("name", "must be 1-255 chars"));
    }
    if !is_valid_email(&req.email) {
        return Err(RsvpError::validation("email", "not a valid email address"));
    }
    if req.plus_ones > MAX_PLUS_ONES {
        return Err(RsvpError::validation("plus_ones", "at most 10"));
    }
    if req.plus_ones > config.max_plus_ones_per_guest {
        return Err(RsvpError::validation(
            "plus_ones",
            format!(
                "this event allows at most {} plus-ones",
                config.max_plus_ones_per_guest
            ),
        ));
    }
    if req.wants_dinner {
        if !config.dinner_enabled {
            return Err(RsvpError::validation(
                "wants_dinner",
                "dinner is not offered for this event",
            ));
        }
        if req.dinner_time_slot.is_none() {
            return Err(RsvpError::validation(
                "dinner_time_slot",
                "required when requesting dinner",
            ));
        }
        let party_size = 1 + req.plus_ones;
        match req.dinner_party_size {
            None => {
                return Err(RsvpError::validation(
                    "dinner_party_size",
                    "required when requesting dinner",
                ));
            }
            Some(0) => {
                return Err(RsvpError::validation("dinner_party_size", "at least 1"));
            }
            Some(n) if n > MAX_DINNER_PARTY => {
                return Err(RsvpError::validation("dinner_party_size", "at most 20"));
            }
            Some(n) if n > party_size => {
                return Err(RsvpError::validation(
                    "dinner_party_size",
                    "cannot exceed the total party size",
                ));
            }
            Some(_) => {}
        }
    }
    Ok(())
}

/// Range checks for the fields an update may touch, against the same
/// per-event limits as creation. Check-in counters are absent on purpose:
/// they are clamped, never rejected.
pub fn validate_update(config: &EventConfig, req: &UpdateRsvpRequest) -> Result<(), RsvpError> {
    if let Some(name) = &req.name {
        if name.is_empty() || name.len() > MAX_NAME_LEN {
            return Err(RsvpError::validation("name", "must be 1-255 chars"));
        }
    }
    if let Some(plus_ones) = req.plus_ones {
        if plus_ones > MAX_PLUS_ONES {
            return Err(RsvpError::validation("plus_ones", "at most 10"));
        }
        if plus_ones > config.max_plus_ones_per_guest {
            return Err(RsvpError::validation(
                "plus_ones",
                format!(
                    "this event allows at most {} plus-ones",
                    config.max_plus_ones_per_guest
                ),
            ));
        }
    }
    if let Some(n) = req.dinner_party_size {
        if n == 0 {
            return Err(RsvpError::validation("dinner_party_size", "at least 1"));
        }
        if n > MAX_DINNER_PARTY {
            return Err(RsvpError::validation("dinner_party_size", "at most 20"));
        }
    }
    Ok(())
}
