//! Dinner seating slot generation.
//!
//! Slots are a pure function of the event configuration — never of store
//! state — so the guest form, the booking engine, and the dashboard all
//! agree on the same ordered list.

use chrono::{DateTime, Duration, Utc};
use guestlist_types::models::EventConfig;

/// Expand the dinner window into discrete seating times: start..=end at
/// the configured interval, ascending. Misconfiguration (dinner disabled,
/// missing window, end <= start, non-positive interval) yields an empty
/// list rather than an error.
pub fn dinner_slots(config: &EventConfig) -> Vec<DateTime<Utc>> {
    if !config.dinner_enabled {
        return Vec::new();
    }
    let (Some(start), Some(end)) = (config.dinner_start, config.dinner_end) else {
        return Vec::new();
    };
    if end <= start {
        return Vec::new();
    }
    let step_minutes = (config.dinner_seating_interval_hours * 60.0).round() as i64;
    if step_minutes <= 0 {
        return Vec::new();
    }
    let step = Duration::minutes(step_minutes);

    let mut slots = Vec::new();
    let mut t = start;
    while t <= end {
        slots.push(t);
        // Stop rather than panic if a window reaches the edge of the
        // representable time range.
        match t.checked_add_signed(step) {
            Some(next) => t = next,
            None => break,
        }
    }
    slots
}

/// Attribute a requested dinner time to the nearest configured slot.
/// Returns `None` when the event has no slots at all. Ties between two
/// equidistant slots resolve to the earlier one.
pub fn resolve_slot(config: &EventConfig, requested: DateTime<Utc>) -> Option<DateTime<Utc>> {
    dinner_slots(config)
        .into_iter()
        .min_by_key(|slot| ((*slot - requested).abs(), *slot))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn dinner_config(start: &str, end: &str, interval_hours: f64) -> EventConfig {
        EventConfig {
            slug: "summer-party".into(),
            name: "Summer Party".into(),
            cocktail_capacity: None,
            food_capacity: None,
            total_capacity: None,
            waitlist_enabled: true,
            max_plus_ones_per_guest: 10,
            dinner_enabled: true,
            dinner_start: Some(start.parse().unwrap()),
            dinner_end: Some(end.parse().unwrap()),
            dinner_seating_interval_hours: interval_hours,
            dinner_max_seats_per_slot: None,
            created_at: "2025-01-01T00:00:00Z".parse().unwrap(),
        }
    }

    fn t(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn hourly_slots_include_both_endpoints() {
        let config = dinner_config("2025-06-01T18:00:00Z", "2025-06-01T21:00:00Z", 1.0);
        assert_eq!(
            dinner_slots(&config),
            vec![
                t("2025-06-01T18:00:00Z"),
                t("2025-06-01T19:00:00Z"),
                t("2025-06-01T20:00:00Z"),
                t("2025-06-01T21:00:00Z"),
            ]
        );
    }

    #[test]
    fn half_hour_interval() {
        let config = dinner_config("2025-06-01T18:00:00Z", "2025-06-01T19:00:00Z", 0.5);
        assert_eq!(dinner_slots(&config).len(), 3);
    }

    #[test]
    fn no_slot_generated_past_end() {
        // 18:00 + 2h steps against a 21:00 end: 18:00, 20:00, never 22:00.
        let config = dinner_config("2025-06-01T18:00:00Z", "2025-06-01T21:00:00Z", 2.0);
        assert_eq!(
            dinner_slots(&config),
            vec![t("2025-06-01T18:00:00Z"), t("2025-06-01T20:00:00Z")]
        );
    }

    #[test]
    fn disabled_or_degenerate_windows_yield_nothing() {
        let mut config = dinner_config("2025-06-01T18:00:00Z", "2025-06-01T21:00:00Z", 1.0);
        config.dinner_enabled = false;
        assert!(dinner_slots(&config).is_empty());

        let config = dinner_config("2025-06-01T21:00:00Z", "2025-06-01T21:00:00Z", 1.0);
        assert!(dinner_slots(&config).is_empty());

        let config = dinner_config("2025-06-01T21:00:00Z", "2025-06-01T18:00:00Z", 1.0);
        assert!(dinner_slots(&config).is_empty());

        let mut config = dinner_config("2025-06-01T18:00:00Z", "2025-06-01T21:00:00Z", 1.0);
        config.dinner_start = None;
        assert!(dinner_slots(&config).is_empty());
    }

    #[test]
    fn generation_is_deterministic() {
        let config = dinner_config("2025-06-01T17:30:00Z", "2025-06-01T22:00:00Z", 1.5);
        let first = dinner_slots(&config);
        for _ in 0..10 {
            assert_eq!(dinner_slots(&config), first);
        }
    }

    #[test]
    fn resolve_snaps_to_nearest_slot() {
        let config = dinner_config("2025-06-01T18:00:00Z", "2025-06-01T21:00:00Z", 1.0);
        assert_eq!(
            resolve_slot(&config, t("2025-06-01T19:00:00Z")),
            Some(t("2025-06-01T19:00:00Z"))
        );
        assert_eq!(
            resolve_slot(&config, t("2025-06-01T19:20:00Z")),
            Some(t("2025-06-01T19:00:00Z"))
        );
        assert_eq!(
            resolve_slot(&config, t("2025-06-01T19:40:00Z")),
            Some(t("2025-06-01T20:00:00Z"))
        );
        // Equidistant between 19:00 and 20:00: earlier slot wins.
        assert_eq!(
            resolve_slot(&config, t("2025-06-01T19:30:00Z")),
            Some(t("2025-06-01T19:00:00Z"))
        );
        // Far outside the window still snaps to the boundary slot.
        assert_eq!(
            resolve_slot(&config, t("2025-06-01T23:59:00Z")),
            Some(t("2025-06-01T21:00:00Z"))
        );
    }

    #[test]
    fn window_at_the_edge_of_representable_time_does_not_panic() {
        let mut config = dinner_config("2025-06-01T18:00:00Z", "2025-06-01T21:00:00Z", 1.0);
        config.dinner_start = Some(DateTime::<Utc>::MAX_UTC - Duration::hours(1));
        config.dinner_end = Some(DateTime::<Utc>::MAX_UTC);
        // Stepping past the end of time stops instead of overflowing.
        assert_eq!(dinner_slots(&config).len(), 2);
    }

    #[test]
    fn resolve_without_slots_is_none() {
        let mut config = dinner_config("2025-06-01T18:00:00Z", "2025-06-01T21:00:00Z", 1.0);
        config.dinner_enabled = false;
        assert_eq!(resolve_slot(&config, t("2025-06-01T19:00:00Z")), None);
    }
}
