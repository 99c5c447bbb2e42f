//! Raw row shapes and the single row-to-domain normalization point.
//!
//! Statuses are stored as lowercase text and timestamps as RFC 3339
//! strings; everything the rest of the system sees is the typed domain
//! model. Corrupt rows surface as storage errors here, not as scattered
//! fallback chains downstream.

use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use guestlist_types::models::{
    BookingStatus, DinnerBooking, DinnerStatus, EventConfig, RsvpRecord,
};
use uuid::Uuid;

#[derive(Debug)]
pub struct EventRow {
    pub slug: String,
    pub name: String,
    pub cocktail_capacity: Option<u32>,
    pub food_capacity: Option<u32>,
    pub total_capacity: Option<u32>,
    pub waitlist_enabled: bool,
    pub max_plus_ones_per_guest: u32,
    pub dinner_enabled: bool,
    pub dinner_start: Option<String>,
    pub dinner_end: Option<String>,
    pub dinner_seating_interval_hours: f64,
    pub dinner_max_seats_per_slot: Option<u32>,
    pub created_at: String,
}

impl EventRow {
    pub fn into_config(self) -> Result<EventConfig> {
        Ok(EventConfig {
            slug: self.slug,
            name: self.name,
            cocktail_capacity: self.cocktail_capacity,
            food_capacity: self.food_capacity,
            total_capacity: self.total_capacity,
            waitlist_enabled: self.waitlist_enabled,
            max_plus_ones_per_guest: self.max_plus_ones_per_guest,
            dinner_enabled: self.dinner_enabled,
            dinner_start: self.dinner_start.as_deref().map(parse_timestamp).transpose()?,
            dinner_end: self.dinner_end.as_deref().map(parse_timestamp).transpose()?,
            dinner_seating_interval_hours: self.dinner_seating_interval_hours,
            dinner_max_seats_per_slot: self.dinner_max_seats_per_slot,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

#[derive(Debug)]
pub struct RsvpRow {
    pub id: String,
    pub event_slug: String,
    pub name: String,
    pub email: String,
    pub plus_ones: u32,
    pub booking_status: String,
    pub dinner_slot_time: Option<String>,
    pub dinner_party_size: Option<u32>,
    pub dinner_status: Option<String>,
    pub dinner_pull_up_count: u32,
    pub cocktail_only_pull_up_count: u32,
    pub created_at: String,
    pub updated_at: String,
}

impl RsvpRow {
    pub fn into_record(self) -> Result<RsvpRecord> {
        let id: Uuid = self
            .id
            .parse()
            .map_err(|e| anyhow!("corrupt rsvp id '{}': {}", self.id, e))?;

        let booking_status = BookingStatus::parse(&self.booking_status)
            .ok_or_else(|| anyhow!("unknown booking status '{}'", self.booking_status))?;

        // The three dinner columns are either all present or all absent.
        let dinner = match (self.dinner_slot_time, self.dinner_party_size, self.dinner_status) {
            (Some(slot), Some(party_size), Some(status)) => Some(DinnerBooking {
                slot_time: parse_timestamp(&slot)?,
                party_size,
                status: DinnerStatus::parse(&status)
                    .ok_or_else(|| anyhow!("unknown dinner status '{}'", status))?,
            }),
            (None, None, None) => None,
            _ => return Err(anyhow!("partial dinner columns on rsvp '{}'", self.id)),
        };

        Ok(RsvpRecord {
            id,
            event_slug: self.event_slug,
            name: self.name,
            email: self.email,
            plus_ones: self.plus_ones,
            booking_status,
            dinner,
            dinner_pull_up_count: self.dinner_pull_up_count,
            cocktail_only_pull_up_count: self.cocktail_only_pull_up_count,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

/// We write RFC 3339; rows created by SQLite defaults use
/// "YYYY-MM-DD HH:MM:SS" without a timezone, parsed as naive UTC.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    s.parse::<DateTime<Utc>>()
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .map_err(|e| anyhow!("corrupt timestamp '{}': {}", s, e))
}
