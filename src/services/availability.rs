use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

use crate::models::{AvailabilitySnapshot, ClockTime, Settings, Slot};
use crate::services::slots::generate_slots;

/// Every slot the opening hours of `date` produce, ignoring bookings and the
/// advance-booking window. A closed day or missing settings yield nothing.
pub fn all_slots(snapshot: &AvailabilitySnapshot, date: NaiveDate) -> Vec<Slot> {
    let Some(settings) = snapshot.settings.as_ref() else {
        return Vec::new();
    };
    if snapshot.is_closed(date) {
        return Vec::new();
    }
    generate_slots(
        snapshot.effective_range(date),
        settings.slot_duration,
        settings.buffer_time,
    )
    .collect()
}

/// Earliest and latest slot start bookable at `now`. `None` when the horizon
/// is not representable as a timestamp.
pub fn advance_window(settings: &Settings, now: DateTime<Utc>) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let min_start = now.checked_add_signed(Duration::hours(i64::from(settings.min_advance_booking)))?;
    let max_start = now.checked_add_signed(Duration::hours(i64::from(settings.max_advance_booking)))?;
    Some((min_start, max_start))
}

/// Slots of `date` whose start lies inside the advance-booking window,
/// bookings not yet considered.
pub fn slots_in_window(snapshot: &AvailabilitySnapshot, date: NaiveDate, now: DateTime<Utc>) -> Vec<Slot> {
    let Some(settings) = snapshot.settings.as_ref() else {
        return Vec::new();
    };
    let Some(tz) = settings.tz() else {
        tracing::warn!(timezone = %settings.timezone, "unknown business timezone, no availability");
        return Vec::new();
    };
    let Some((min_start, max_start)) = advance_window(settings, now) else {
        tracing::warn!(
            max_advance_booking = settings.max_advance_booking,
            "booking horizon out of range, no availability"
        );
        return Vec::new();
    };

    all_slots(snapshot, date)
        .into_iter()
        .filter(|slot| match slot_start_instant(tz, date, slot.start_time) {
            Some(start) => start >= min_start && start <= max_start,
            None => false,
        })
        .collect()
}

/// Bookable slots for `date` as of `now`, in ascending order.
///
/// Resolution: a closed override empties the day; slots outside the
/// advance-booking window are dropped; the remaining candidates come from the
/// override's custom hours or the weekly schedule; any candidate overlapping a
/// non-cancelled booking is removed. Missing settings, an unknown timezone or
/// an unrepresentable window fail closed.
pub fn available_slots(
    snapshot: &AvailabilitySnapshot,
    date: NaiveDate,
    now: DateTime<Utc>,
) -> Vec<Slot> {
    slots_in_window(snapshot, date, now)
        .into_iter()
        .filter(|slot| {
            let range = slot.range();
            !snapshot
                .bookings_on(date)
                .filter_map(|b| b.range())
                .any(|booked| range.overlaps(&booked))
        })
        .collect()
}

/// True when `(start, end)` is exactly one of the available slots for `date`.
pub fn is_bookable(
    snapshot: &AvailabilitySnapshot,
    date: NaiveDate,
    start: ClockTime,
    end: ClockTime,
    now: DateTime<Utc>,
) -> bool {
    available_slots(snapshot, date, now)
        .iter()
        .any(|slot| slot.start_time == start && slot.end_time == end)
}

/// The instant a wall-clock time on `date` denotes in the business timezone.
/// Ambiguous times (DST fall-back) take the earlier instant; times skipped by
/// a DST jump have none.
pub fn slot_start_instant(tz: Tz, date: NaiveDate, time: ClockTime) -> Option<DateTime<Utc>> {
    let local = date.and_time(time.to_naive_time());
    tz.from_local_datetime(&local)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookedInterval, DateOverride, Settings, WeeklySchedule};

    fn t(s: &str) -> ClockTime {
        s.parse().unwrap()
    }

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn settings() -> Settings {
        Settings {
            slot_duration: 60,
            buffer_time: 15,
            min_advance_booking: 24,
            max_advance_booking: 2160,
            require_approval: false,
            timezone: "UTC".to_string(),
        }
    }

    fn monday_snapshot() -> AvailabilitySnapshot {
        AvailabilitySnapshot {
            settings: Some(settings()),
            schedules: vec![WeeklySchedule {
                day_of_week: 1,
                start_time: t("09:00"),
                end_time: t("18:00"),
                is_enabled: true,
            }],
            overrides: vec![],
            bookings: vec![],
        }
    }

    fn booked(date: &str, start: &str, end: &str) -> BookedInterval {
        BookedInterval {
            date: d(date),
            start_time: t(start),
            end_time: t(end),
        }
    }

    // 2026-03-16 is a Monday; "now" sits a week earlier.
    const MONDAY: &str = "2026-03-16";
    const NOW: &str = "2026-03-09T00:00:00Z";

    fn starts(slots: &[Slot]) -> Vec<String> {
        slots.iter().map(|s| s.start_time.to_string()).collect()
    }

    #[test]
    fn test_open_monday_has_seven_slots() {
        let slots = available_slots(&monday_snapshot(), d(MONDAY), utc(NOW));
        assert_eq!(
            starts(&slots),
            vec!["09:00", "10:15", "11:30", "12:45", "14:00", "15:15", "16:30"]
        );
    }

    #[test]
    fn test_booking_removes_exactly_its_slot() {
        let mut snap = monday_snapshot();
        snap.bookings.push(booked(MONDAY, "14:00", "15:00"));
        let slots = available_slots(&snap, d(MONDAY), utc(NOW));
        assert_eq!(slots.len(), 6);
        assert!(!starts(&slots).contains(&"14:00".to_string()));
    }

    #[test]
    fn test_partial_overlap_removes_slot() {
        let mut snap = monday_snapshot();
        // touches 10:15-11:15 and 11:30-12:30
        snap.bookings.push(booked(MONDAY, "11:00", "11:45"));
        let slots = available_slots(&snap, d(MONDAY), utc(NOW));
        assert_eq!(starts(&slots), vec!["09:00", "12:45", "14:00", "15:15", "16:30"]);
    }

    #[test]
    fn test_booking_in_buffer_gap_removes_nothing() {
        let mut snap = monday_snapshot();
        snap.bookings.push(booked(MONDAY, "10:00", "10:15"));
        assert_eq!(available_slots(&snap, d(MONDAY), utc(NOW)).len(), 7);
    }

    #[test]
    fn test_bookings_on_other_dates_ignored() {
        let mut snap = monday_snapshot();
        snap.bookings.push(booked("2026-03-23", "09:00", "10:00"));
        assert_eq!(available_slots(&snap, d(MONDAY), utc(NOW)).len(), 7);
    }

    #[test]
    fn test_no_slot_overlaps_any_booking_or_other_slot() {
        let mut snap = monday_snapshot();
        snap.bookings.push(booked(MONDAY, "09:30", "10:30"));
        snap.bookings.push(booked(MONDAY, "15:00", "15:20"));
        let slots = available_slots(&snap, d(MONDAY), utc(NOW));
        for (i, a) in slots.iter().enumerate() {
            for b in &slots[i + 1..] {
                assert!(!a.range().overlaps(&b.range()));
            }
            for bk in &snap.bookings {
                assert!(!a.range().overlaps(&bk.range().unwrap()));
            }
        }
    }

    #[test]
    fn test_closed_override_empties_day() {
        let mut snap = monday_snapshot();
        snap.overrides.push(DateOverride::closed(d(MONDAY)));
        assert!(available_slots(&snap, d(MONDAY), utc(NOW)).is_empty());
        assert!(all_slots(&snap, d(MONDAY)).is_empty());
    }

    #[test]
    fn test_closed_override_with_hours_still_closed() {
        let mut snap = monday_snapshot();
        snap.overrides.push(DateOverride {
            date: d(MONDAY),
            is_available: false,
            start_time: Some(t("09:00")),
            end_time: Some(t("18:00")),
        });
        assert!(available_slots(&snap, d(MONDAY), utc(NOW)).is_empty());
    }

    #[test]
    fn test_custom_hours_override() {
        let mut snap = monday_snapshot();
        snap.overrides
            .push(DateOverride::custom_hours(d(MONDAY), t("12:00"), t("15:00")));
        let slots = available_slots(&snap, d(MONDAY), utc(NOW));
        assert_eq!(starts(&slots), vec!["12:00", "13:15"]);
    }

    #[test]
    fn test_override_opens_unscheduled_day() {
        let mut snap = monday_snapshot();
        // Sunday
        snap.overrides
            .push(DateOverride::custom_hours(d("2026-03-15"), t("10:00"), t("12:00")));
        let slots = available_slots(&snap, d("2026-03-15"), utc(NOW));
        assert_eq!(starts(&slots), vec!["10:00"]);
    }

    #[test]
    fn test_unscheduled_day_is_empty() {
        assert!(available_slots(&monday_snapshot(), d("2026-03-17"), utc(NOW)).is_empty());
    }

    #[test]
    fn test_missing_settings_fail_closed() {
        let mut snap = monday_snapshot();
        snap.settings = None;
        assert!(available_slots(&snap, d(MONDAY), utc(NOW)).is_empty());
    }

    #[test]
    fn test_unknown_timezone_fails_closed() {
        let mut snap = monday_snapshot();
        if let Some(s) = snap.settings.as_mut() {
            s.timezone = "Nowhere/Special".to_string();
        }
        assert!(available_slots(&snap, d(MONDAY), utc(NOW)).is_empty());
    }

    #[test]
    fn test_min_advance_rejects_slot_ten_hours_out() {
        // 09:00 on the Monday is 10 hours after 23:00 the night before
        let now = utc("2026-03-15T23:00:00Z");
        let slots = available_slots(&monday_snapshot(), d(MONDAY), now);
        assert!(slots.is_empty());
        assert!(!is_bookable(&monday_snapshot(), d(MONDAY), t("09:00"), t("10:00"), now));
    }

    #[test]
    fn test_min_advance_is_per_slot() {
        // 24h before 12:45 Monday: earlier slots are too soon
        let now = utc("2026-03-15T12:45:00Z");
        let slots = available_slots(&monday_snapshot(), d(MONDAY), now);
        assert_eq!(starts(&slots), vec!["12:45", "14:00", "15:15", "16:30"]);
    }

    #[test]
    fn test_max_advance_rejects_far_future() {
        let mut snap = monday_snapshot();
        if let Some(s) = snap.settings.as_mut() {
            s.max_advance_booking = 48;
        }
        assert!(available_slots(&snap, d(MONDAY), utc(NOW)).is_empty());
    }

    #[test]
    fn test_unrepresentable_horizon_fails_closed() {
        let mut snap = monday_snapshot();
        if let Some(s) = snap.settings.as_mut() {
            s.max_advance_booking = u32::MAX;
        }
        assert!(available_slots(&snap, d(MONDAY), utc(NOW)).is_empty());
        assert!(advance_window(&settings(), utc(NOW)).is_some());
    }

    #[test]
    fn test_huge_buffer_leaves_first_slot_only() {
        let mut snap = monday_snapshot();
        if let Some(s) = snap.settings.as_mut() {
            s.buffer_time = u32::MAX;
        }
        let slots = available_slots(&snap, d(MONDAY), utc(NOW));
        assert_eq!(starts(&slots), vec!["09:00"]);
    }

    #[test]
    fn test_window_uses_business_timezone() {
        let mut snap = monday_snapshot();
        if let Some(s) = snap.settings.as_mut() {
            s.timezone = "Pacific/Auckland".to_string();
        }
        // Monday 09:00 in Auckland (UTC+13 in March) is Sunday 20:00 UTC.
        // 25h before that, only 09:00 and later are >= 24h away.
        let now = utc("2026-03-14T19:00:00Z");
        let slots = available_slots(&snap, d(MONDAY), now);
        assert_eq!(slots.len(), 7);

        // ninety minutes later, 09:00 drops out
        let now = utc("2026-03-14T20:30:00Z");
        let slots = available_slots(&snap, d(MONDAY), now);
        assert_eq!(starts(&slots)[0], "10:15");
    }

    #[test]
    fn test_weekday_independent_of_timezone() {
        for tz in ["Pacific/Auckland", "America/Los_Angeles", "UTC", "Asia/Kolkata"] {
            let mut snap = monday_snapshot();
            if let Some(s) = snap.settings.as_mut() {
                s.timezone = tz.to_string();
            }
            assert_eq!(available_slots(&snap, d(MONDAY), utc(NOW)).len(), 7, "{tz}");
        }
    }

    #[test]
    fn test_dst_gap_slot_dropped() {
        let snap = AvailabilitySnapshot {
            settings: Some(Settings {
                slot_duration: 60,
                buffer_time: 0,
                min_advance_booking: 0,
                max_advance_booking: 2160,
                require_approval: false,
                timezone: "America/New_York".to_string(),
            }),
            schedules: vec![WeeklySchedule {
                day_of_week: 0,
                start_time: t("01:00"),
                end_time: t("04:00"),
                is_enabled: true,
            }],
            overrides: vec![],
            bookings: vec![],
        };
        // 2026-03-08: clocks jump from 02:00 to 03:00 in New York
        let slots = available_slots(&snap, d("2026-03-08"), utc("2026-03-01T00:00:00Z"));
        assert_eq!(starts(&slots), vec!["01:00", "03:00"]);
    }

    #[test]
    fn test_idempotent() {
        let mut snap = monday_snapshot();
        snap.bookings.push(booked(MONDAY, "11:30", "12:30"));
        let a = available_slots(&snap, d(MONDAY), utc(NOW));
        let b = available_slots(&snap, d(MONDAY), utc(NOW));
        assert_eq!(a, b);
    }

    #[test]
    fn test_is_bookable_matches_available_slots() {
        let snap = monday_snapshot();
        for slot in available_slots(&snap, d(MONDAY), utc(NOW)) {
            assert!(is_bookable(&snap, d(MONDAY), slot.start_time, slot.end_time, utc(NOW)));
        }
        // inside opening hours but not on the slot grid
        assert!(!is_bookable(&snap, d(MONDAY), t("09:30"), t("10:30"), utc(NOW)));
        // right start, wrong length
        assert!(!is_bookable(&snap, d(MONDAY), t("09:00"), t("09:30"), utc(NOW)));
    }

    #[test]
    fn test_all_slots_ignores_bookings() {
        let mut snap = monday_snapshot();
        snap.bookings.push(booked(MONDAY, "14:00", "15:00"));
        assert_eq!(all_slots(&snap, d(MONDAY)).len(), 7);
    }
}
