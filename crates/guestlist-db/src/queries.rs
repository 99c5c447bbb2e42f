use chrono::Utc;
use rusqlite::Connection;
use uuid::Uuid;

use guestlist_core::booking::{self, BookingRequest, DinnerRequest};
use guestlist_core::error::RsvpError;
use guestlist_core::{aggregate, record, slots, validate};
use guestlist_types::api::{CreateEventRequest, EventStats, SubmitRsvpRequest, UpdateRsvpRequest};
use guestlist_types::models::{EventConfig, RsvpRecord};

use crate::Database;
use crate::models::{EventRow, RsvpRow};

impl Database {
    // -- Events --

    pub fn create_event(&self, req: &CreateEventRequest) -> Result<EventConfig, RsvpError> {
        validate::validate_event(req)?;

        self.with_conn(|conn| {
            let now = Utc::now();
            let result = conn.execute(
                "INSERT INTO events (slug, name, cocktail_capacity, food_capacity,
                     total_capacity, waitlist_enabled, max_plus_ones_per_guest,
                     dinner_enabled, dinner_start, dinner_end,
                     dinner_seating_interval_hours, dinner_max_seats_per_slot, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                rusqlite::params![
                    req.slug,
                    req.name,
                    req.cocktail_capacity,
                    req.food_capacity,
                    req.total_capacity,
                    req.waitlist_enabled,
                    req.max_plus_ones_per_guest,
                    req.dinner_enabled,
                    req.dinner_start.map(|t| t.to_rfc3339()),
                    req.dinner_end.map(|t| t.to_rfc3339()),
                    req.dinner_seating_interval_hours,
                    req.dinner_max_seats_per_slot,
                    now.to_rfc3339(),
                ],
            );
            match result {
                Ok(_) => {}
                Err(e) if is_unique_violation(&e) => {
                    return Err(RsvpError::Duplicate { field: "slug" });
                }
                Err(e) => return Err(RsvpError::Storage(e.into())),
            }

            query_event(conn, &req.slug)?.ok_or(RsvpError::NotFound)
        })
    }

    pub fn get_event(&self, slug: &str) -> Result<EventConfig, RsvpError> {
        self.with_conn(|conn| query_event(conn, slug)?.ok_or(RsvpError::NotFound))
    }

    // -- RSVPs --

    /// Submit a guest party. The capacity check and the insert run under
    /// one lock acquisition, so the booking decision is always made
    /// against the state it commits into.
    pub fn submit_rsvp(
        &self,
        event_slug: &str,
        req: &SubmitRsvpRequest,
    ) -> Result<RsvpRecord, RsvpError> {
        let mut req = req.clone();
        req.email = req.email.trim().to_ascii_lowercase();

        self.with_conn(|conn| {
            let config = query_event(conn, event_slug)?.ok_or(RsvpError::NotFound)?;
            validate::validate_submission(&config, &req)?;

            let records = query_rsvps(conn, event_slug)?;

            let dinner = if req.wants_dinner {
                let Some(requested) = req.dinner_time_slot else {
                    return Err(RsvpError::validation("dinner_time_slot", "required"));
                };
                let slot_time = slots::resolve_slot(&config, requested).ok_or_else(|| {
                    RsvpError::validation("dinner_time_slot", "no dinner slots are configured")
                })?;
                Some(DinnerRequest {
                    slot_time,
                    party_size: req.dinner_party_size.unwrap_or(1),
                })
            } else {
                None
            };

            let decision = booking::decide(
                &config,
                &records,
                &BookingRequest {
                    party_size: 1 + req.plus_ones,
                    dinner,
                },
            )?;

            let rsvp = record::new_record(&req, event_slug, decision, Utc::now());
            match insert_rsvp(conn, &rsvp) {
                Ok(()) => Ok(rsvp),
                Err(e) if is_unique_violation(&e) => Err(RsvpError::Duplicate { field: "email" }),
                Err(e) => Err(RsvpError::Storage(e.into())),
            }
        })
    }

    pub fn get_rsvp(&self, id: Uuid) -> Result<RsvpRecord, RsvpError> {
        self.with_conn(|conn| query_rsvp(conn, id)?.ok_or(RsvpError::NotFound))
    }

    /// All records for an event in arrival order, cancelled included.
    pub fn list_rsvps(&self, event_slug: &str) -> Result<Vec<RsvpRecord>, RsvpError> {
        self.with_conn(|conn| {
            query_event(conn, event_slug)?.ok_or(RsvpError::NotFound)?;
            Ok(query_rsvps(conn, event_slug)?)
        })
    }

    /// Apply a partial update. Cascades and clamps happen in
    /// `guestlist_core::record`; the row is rewritten in one statement so
    /// no reader ever sees half of a cascade.
    pub fn update_rsvp(
        &self,
        id: Uuid,
        patch: &UpdateRsvpRequest,
    ) -> Result<RsvpRecord, RsvpError> {
        self.with_conn(|conn| {
            let mut rsvp = query_rsvp(conn, id)?.ok_or(RsvpError::NotFound)?;
            let config = query_event(conn, &rsvp.event_slug)?.ok_or(RsvpError::NotFound)?;
            validate::validate_update(&config, patch)?;

            // Snap any requested dinner time to a configured slot before
            // the merge sees it.
            let mut patch = patch.clone();
            if let Some(requested) = patch.dinner_time_slot {
                let slot_time = slots::resolve_slot(&config, requested).ok_or_else(|| {
                    RsvpError::validation("dinner_time_slot", "no dinner slots are configured")
                })?;
                patch.dinner_time_slot = Some(slot_time);
            }

            record::apply_update(&mut rsvp, &patch, Utc::now())?;
            update_rsvp_row(conn, &rsvp)?;
            Ok(rsvp)
        })
    }

    // -- Stats --

    pub fn event_stats(&self, event_slug: &str) -> Result<EventStats, RsvpError> {
        self.with_conn(|conn| {
            let config = query_event(conn, event_slug)?.ok_or(RsvpError::NotFound)?;
            let records = query_rsvps(conn, event_slug)?;
            Ok(aggregate::event_stats(&config, &records))
        })
    }
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

const EVENT_COLUMNS: &str = "slug, name, cocktail_capacity, food_capacity, total_capacity,
    waitlist_enabled, max_plus_ones_per_guest, dinner_enabled, dinner_start, dinner_end,
    dinner_seating_interval_hours, dinner_max_seats_per_slot, created_at";

fn query_event(conn: &Connection, slug: &str) -> anyhow::Result<Option<EventConfig>> {
    let mut stmt =
        conn.prepare(&format!("SELECT {EVENT_COLUMNS} FROM events WHERE slug = ?1"))?;

    let row = stmt
        .query_row([slug], |row| {
            Ok(EventRow {
                slug: row.get(0)?,
                name: row.get(1)?,
                cocktail_capacity: row.get(2)?,
                food_capacity: row.get(3)?,
                total_capacity: row.get(4)?,
                waitlist_enabled: row.get(5)?,
                max_plus_ones_per_guest: row.get(6)?,
                dinner_enabled: row.get(7)?,
                dinner_start: row.get(8)?,
                dinner_end: row.get(9)?,
                dinner_seating_interval_hours: row.get(10)?,
                dinner_max_seats_per_slot: row.get(11)?,
                created_at: row.get(12)?,
            })
        })
        .optional()?;

    row.map(EventRow::into_config).transpose()
}

const RSVP_COLUMNS: &str = "id, event_slug, name, email, plus_ones, booking_status,
    dinner_slot_time, dinner_party_size, dinner_status, dinner_pull_up_count,
    cocktail_only_pull_up_count, created_at, updated_at";

fn rsvp_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RsvpRow> {
    Ok(RsvpRow {
        id: row.get(0)?,
        event_slug: row.get(1)?,
        name: row.get(2)?,
        email: row.get(3)?,
        plus_ones: row.get(4)?,
        booking_status: row.get(5)?,
        dinner_slot_time: row.get(6)?,
        dinner_party_size: row.get(7)?,
        dinner_status: row.get(8)?,
        dinner_pull_up_count: row.get(9)?,
        cocktail_only_pull_up_count: row.get(10)?,
        created_at: row.get(11)?,
        updated_at: row.get(12)?,
    })
}

fn query_rsvp(conn: &Connection, id: Uuid) -> anyhow::Result<Option<RsvpRecord>> {
    let mut stmt = conn.prepare(&format!("SELECT {RSVP_COLUMNS} FROM rsvps WHERE id = ?1"))?;

    let row = stmt
        .query_row([id.to_string()], rsvp_from_row)
        .optional()?;

    row.map(RsvpRow::into_record).transpose()
}

/// Arrival order: the ordering the first-come-first-served capacity
/// decisions were made in.
fn query_rsvps(conn: &Connection, event_slug: &str) -> anyhow::Result<Vec<RsvpRecord>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {RSVP_COLUMNS} FROM rsvps WHERE event_slug = ?1 ORDER BY created_at, id"
    ))?;

    let rows = stmt
        .query_map([event_slug], rsvp_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    rows.into_iter().map(RsvpRow::into_record).collect()
}

fn insert_rsvp(conn: &Connection, r: &RsvpRecord) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO rsvps (id, event_slug, name, email, plus_ones, booking_status,
             dinner_slot_time, dinner_party_size, dinner_status, dinner_pull_up_count,
             cocktail_only_pull_up_count, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        rusqlite::params![
            r.id.to_string(),
            r.event_slug,
            r.name,
            r.email,
            r.plus_ones,
            r.booking_status.as_str(),
            r.dinner.as_ref().map(|d| d.slot_time.to_rfc3339()),
            r.dinner.as_ref().map(|d| d.party_size),
            r.dinner.as_ref().map(|d| d.status.as_str()),
            r.dinner_pull_up_count,
            r.cocktail_only_pull_up_count,
            r.created_at.to_rfc3339(),
            r.updated_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

/// Single-statement rewrite: cascaded fields (dinner columns and check-in
/// counters) land atomically with whatever triggered them.
fn update_rsvp_row(conn: &Connection, r: &RsvpRecord) -> anyhow::Result<()> {
    conn.execute(
        "UPDATE rsvps SET name = ?2, plus_ones = ?3, booking_status = ?4,
             dinner_slot_time = ?5, dinner_party_size = ?6, dinner_status = ?7,
             dinner_pull_up_count = ?8, cocktail_only_pull_up_count = ?9, updated_at = ?10
         WHERE id = ?1",
        rusqlite::params![
            r.id.to_string(),
            r.name,
            r.plus_ones,
            r.booking_status.as_str(),
            r.dinner.as_ref().map(|d| d.slot_time.to_rfc3339()),
            r.dinner.as_ref().map(|d| d.party_size),
            r.dinner.as_ref().map(|d| d.status.as_str()),
            r.dinner_pull_up_count,
            r.cocktail_only_pull_up_count,
            r.updated_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> anyhow::Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> anyhow::Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use guestlist_types::models::{BookingStatus, DinnerStatus};

    fn t(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn db_with_event() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.create_event(&CreateEventRequest {
            slug: "rooftop".into(),
            name: "Rooftop Night".into(),
            cocktail_capacity: Some(50),
            food_capacity: None,
            total_capacity: Some(60),
            waitlist_enabled: true,
            max_plus_ones_per_guest: 10,
            dinner_enabled: true,
            dinner_start: Some(t("2025-06-01T18:00:00Z")),
            dinner_end: Some(t("2025-06-01T21:00:00Z")),
            dinner_seating_interval_hours: 1.0,
            dinner_max_seats_per_slot: Some(10),
        })
        .unwrap();
        db
    }

    fn submission(email: &str, plus_ones: u32) -> SubmitRsvpRequest {
        SubmitRsvpRequest {
            name: "Guest".into(),
            email: email.into(),
            plus_ones,
            wants_dinner: false,
            dinner_time_slot: None,
            dinner_party_size: None,
        }
    }

    fn dinner_submission(email: &str, plus_ones: u32, slot: &str, seats: u32) -> SubmitRsvpRequest {
        SubmitRsvpRequest {
            name: "Guest".into(),
            email: email.into(),
            plus_ones,
            wants_dinner: true,
            dinner_time_slot: Some(t(slot)),
            dinner_party_size: Some(seats),
        }
    }

    #[test]
    fn submit_and_read_back() {
        let db = db_with_event();
        let r = db
            .submit_rsvp("rooftop", &dinner_submission("ada@example.com", 3, "2025-06-01T19:00:00Z", 2))
            .unwrap();
        assert_eq!(r.booking_status, BookingStatus::Confirmed);
        assert_eq!(r.dinner.as_ref().unwrap().status, DinnerStatus::Confirmed);

        let fetched = db.get_rsvp(r.id).unwrap();
        assert_eq!(fetched.email, "ada@example.com");
        assert_eq!(fetched.plus_ones, 3);
        assert_eq!(fetched.dinner.as_ref().unwrap().party_size, 2);
        assert_eq!(fetched.dinner.as_ref().unwrap().slot_time, t("2025-06-01T19:00:00Z"));
    }

    #[test]
    fn email_is_normalized_and_unique_per_event() {
        let db = db_with_event();
        db.submit_rsvp("rooftop", &submission("Ada@Example.COM", 0)).unwrap();

        let err = db
            .submit_rsvp("rooftop", &submission("ada@example.com ", 2))
            .unwrap_err();
        assert!(matches!(err, RsvpError::Duplicate { field: "email" }));

        // Same email at a different event is fine.
        db.create_event(&CreateEventRequest {
            slug: "afterparty".into(),
            name: "Afterparty".into(),
            cocktail_capacity: None,
            food_capacity: None,
            total_capacity: None,
            waitlist_enabled: true,
            max_plus_ones_per_guest: 10,
            dinner_enabled: false,
            dinner_start: None,
            dinner_end: None,
            dinner_seating_interval_hours: 1.0,
            dinner_max_seats_per_slot: None,
        })
        .unwrap();
        db.submit_rsvp("afterparty", &submission("ada@example.com", 0)).unwrap();
    }

    #[test]
    fn duplicate_event_slug_rejected() {
        let db = db_with_event();
        let err = db
            .create_event(&CreateEventRequest {
                slug: "rooftop".into(),
                name: "Imposter".into(),
                cocktail_capacity: None,
                food_capacity: None,
                total_capacity: None,
                waitlist_enabled: true,
                max_plus_ones_per_guest: 10,
                dinner_enabled: false,
                dinner_start: None,
                dinner_end: None,
                dinner_seating_interval_hours: 1.0,
                dinner_max_seats_per_slot: None,
            })
            .unwrap_err();
        assert!(matches!(err, RsvpError::Duplicate { field: "slug" }));
    }

    #[test]
    fn capacity_waitlists_a_party_that_would_overflow() {
        let db = db_with_event();
        // Fill to 48 of 50.
        for i in 0..8 {
            db.submit_rsvp("rooftop", &submission(&format!("g{i}@example.com"), 5))
                .unwrap();
        }
        let r = db
            .submit_rsvp("rooftop", &submission("late@example.com", 4))
            .unwrap();
        assert_eq!(r.booking_status, BookingStatus::Waitlist);
    }

    #[test]
    fn hard_closed_event_rejects_without_creating_a_record() {
        let db = Database::open_in_memory().unwrap();
        db.create_event(&CreateEventRequest {
            slug: "tiny".into(),
            name: "Tiny".into(),
            cocktail_capacity: Some(2),
            food_capacity: None,
            total_capacity: None,
            waitlist_enabled: false,
            max_plus_ones_per_guest: 10,
            dinner_enabled: false,
            dinner_start: None,
            dinner_end: None,
            dinner_seating_interval_hours: 1.0,
            dinner_max_seats_per_slot: None,
        })
        .unwrap();

        db.submit_rsvp("tiny", &submission("first@example.com", 1)).unwrap();
        let err = db
            .submit_rsvp("tiny", &submission("second@example.com", 0))
            .unwrap_err();
        assert!(matches!(err, RsvpError::CapacityExceeded));
        assert_eq!(db.list_rsvps("tiny").unwrap().len(), 1);
    }

    #[test]
    fn dinner_slot_overflow_waitlists_dinner_independently() {
        let db = db_with_event();
        db.submit_rsvp(
            "rooftop",
            &dinner_submission("early@example.com", 9, "2025-06-01T19:00:00Z", 9),
        )
        .unwrap();

        let r = db
            .submit_rsvp(
                "rooftop",
                &dinner_submission("late@example.com", 2, "2025-06-01T19:00:00Z", 3),
            )
            .unwrap();
        assert_eq!(r.booking_status, BookingStatus::Confirmed);
        assert_eq!(r.dinner.as_ref().unwrap().status, DinnerStatus::Waitlist);
    }

    #[test]
    fn off_grid_dinner_time_snaps_to_a_configured_slot() {
        let db = db_with_event();
        let r = db
            .submit_rsvp(
                "rooftop",
                &dinner_submission("snap@example.com", 1, "2025-06-01T19:10:00Z", 2),
            )
            .unwrap();
        assert_eq!(r.dinner.as_ref().unwrap().slot_time, t("2025-06-01T19:00:00Z"));
    }

    #[test]
    fn update_persists_the_opt_out_cascade_atomically() {
        let db = db_with_event();
        let r = db
            .submit_rsvp("rooftop", &dinner_submission("nora@example.com", 6, "2025-06-01T19:00:00Z", 4))
            .unwrap();

        db.update_rsvp(
            r.id,
            &UpdateRsvpRequest {
                dinner_pull_up_count: Some(3),
                cocktail_only_pull_up_count: Some(2),
                ..Default::default()
            },
        )
        .unwrap();

        let updated = db
            .update_rsvp(
                r.id,
                &UpdateRsvpRequest {
                    wants_dinner: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(updated.dinner.is_none());
        assert_eq!(updated.dinner_pull_up_count, 0);
        assert_eq!(updated.cocktail_only_pull_up_count, 2);

        // What a later reader sees matches what the updater was told.
        let fetched = db.get_rsvp(r.id).unwrap();
        assert!(fetched.dinner.is_none());
        assert_eq!(fetched.dinner_pull_up_count, 0);
        assert_eq!(fetched.cocktail_only_pull_up_count, 2);
    }

    #[test]
    fn check_in_counts_clamp_and_survive_reload() {
        let db = db_with_event();
        let r = db
            .submit_rsvp("rooftop", &dinner_submission("max@example.com", 4, "2025-06-01T18:00:00Z", 3))
            .unwrap();

        let updated = db
            .update_rsvp(
                r.id,
                &UpdateRsvpRequest {
                    dinner_pull_up_count: Some(50),
                    cocktail_only_pull_up_count: Some(50),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.dinner_pull_up_count, 3);
        assert_eq!(updated.cocktail_only_pull_up_count, 2);

        let fetched = db.get_rsvp(r.id).unwrap();
        assert_eq!(fetched.dinner_pull_up_count, 3);
        assert_eq!(fetched.cocktail_only_pull_up_count, 2);
    }

    #[test]
    fn unknown_ids_and_slugs_are_not_found() {
        let db = db_with_event();
        assert!(matches!(db.get_event("nope"), Err(RsvpError::NotFound)));
        assert!(matches!(db.list_rsvps("nope"), Err(RsvpError::NotFound)));
        assert!(matches!(db.get_rsvp(Uuid::new_v4()), Err(RsvpError::NotFound)));
        assert!(matches!(
            db.update_rsvp(Uuid::new_v4(), &UpdateRsvpRequest::default()),
            Err(RsvpError::NotFound)
        ));
    }

    #[test]
    fn cancellation_frees_capacity_for_future_submissions_only() {
        let db = Database::open_in_memory().unwrap();
        db.create_event(&CreateEventRequest {
            slug: "salon".into(),
            name: "Salon".into(),
            cocktail_capacity: Some(4),
            food_capacity: None,
            total_capacity: None,
            waitlist_enabled: true,
            max_plus_ones_per_guest: 10,
            dinner_enabled: false,
            dinner_start: None,
            dinner_end: None,
            dinner_seating_interval_hours: 1.0,
            dinner_max_seats_per_slot: None,
        })
        .unwrap();

        let first = db.submit_rsvp("salon", &submission("a@example.com", 3)).unwrap();
        let second = db.submit_rsvp("salon", &submission("b@example.com", 1)).unwrap();
        assert_eq!(second.booking_status, BookingStatus::Waitlist);

        db.update_rsvp(
            first.id,
            &UpdateRsvpRequest {
                booking_status: Some(BookingStatus::Cancelled),
                ..Default::default()
            },
        )
        .unwrap();

        // No auto-promotion: the waitlisted party stays waitlisted.
        assert_eq!(
            db.get_rsvp(second.id).unwrap().booking_status,
            BookingStatus::Waitlist
        );
        // But a new submission sees the freed capacity.
        let third = db.submit_rsvp("salon", &submission("c@example.com", 2)).unwrap();
        assert_eq!(third.booking_status, BookingStatus::Confirmed);
    }

    #[test]
    fn update_enforces_the_same_plus_one_limit_as_submission() {
        let db = Database::open_in_memory().unwrap();
        db.create_event(&CreateEventRequest {
            slug: "intimate".into(),
            name: "Intimate Dinner".into(),
            cocktail_capacity: None,
            food_capacity: None,
            total_capacity: None,
            waitlist_enabled: true,
            max_plus_ones_per_guest: 2,
            dinner_enabled: false,
            dinner_start: None,
            dinner_end: None,
            dinner_seating_interval_hours: 1.0,
            dinner_max_seats_per_slot: None,
        })
        .unwrap();

        // Rejected at the door...
        let err = db
            .submit_rsvp("intimate", &submission("big@example.com", 9))
            .unwrap_err();
        assert!(matches!(err, RsvpError::Validation { field: "plus_ones", .. }));

        // ...and equally rejected through a revision.
        let r = db.submit_rsvp("intimate", &submission("ok@example.com", 1)).unwrap();
        let err = db
            .update_rsvp(
                r.id,
                &UpdateRsvpRequest {
                    plus_ones: Some(9),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, RsvpError::Validation { field: "plus_ones", .. }));
        assert_eq!(db.get_rsvp(r.id).unwrap().plus_ones, 1);

        let updated = db
            .update_rsvp(
                r.id,
                &UpdateRsvpRequest {
                    plus_ones: Some(2),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.plus_ones, 2);
    }

    #[test]
    fn stats_reflect_the_live_record_set() {
        let db = db_with_event();
        db.submit_rsvp("rooftop", &dinner_submission("a@example.com", 3, "2025-06-01T19:00:00Z", 2))
            .unwrap();
        db.submit_rsvp("rooftop", &submission("b@example.com", 4)).unwrap();

        let stats = db.event_stats("rooftop").unwrap();
        assert_eq!(stats.attending, 9);
        assert_eq!(stats.dinner_confirmed, 2);
        assert_eq!(stats.slots.len(), 4);
        let s19 = stats.slots.iter().find(|s| s.time == t("2025-06-01T19:00:00Z")).unwrap();
        assert_eq!(s19.confirmed, 2);
        assert_eq!(s19.remaining_seats, Some(8));
    }
}
