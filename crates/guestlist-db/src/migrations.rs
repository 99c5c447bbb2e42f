use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS events (
            slug                            TEXT PRIMARY KEY,
            name                            TEXT NOT NULL,
            cocktail_capacity               INTEGER,
            food_capacity                   INTEGER,
            total_capacity                  INTEGER,
            waitlist_enabled                INTEGER NOT NULL DEFAULT 1,
            max_plus_ones_per_guest         INTEGER NOT NULL DEFAULT 10,
            dinner_enabled                  INTEGER NOT NULL DEFAULT 0,
            dinner_start                    TEXT,
            dinner_end                      TEXT,
            dinner_seating_interval_hours   REAL NOT NULL DEFAULT 1.0,
            dinner_max_seats_per_slot       INTEGER,
            created_at                      TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS rsvps (
            id                          TEXT PRIMARY KEY,
            event_slug                  TEXT NOT NULL REFERENCES events(slug),
            name                        TEXT NOT NULL,
            email                       TEXT NOT NULL,
            plus_ones                   INTEGER NOT NULL DEFAULT 0,
            booking_status              TEXT NOT NULL,
            dinner_slot_time            TEXT,
            dinner_party_size           INTEGER,
            dinner_status               TEXT,
            dinner_pull_up_count        INTEGER NOT NULL DEFAULT 0,
            cocktail_only_pull_up_count INTEGER NOT NULL DEFAULT 0,
            created_at                  TEXT NOT NULL,
            updated_at                  TEXT NOT NULL,
            UNIQUE(event_slug, email)
        );

        CREATE INDEX IF NOT EXISTS idx_rsvps_event
            ON rsvps(event_slug, created_at);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
