//! Reminder window classification
//!
//! Pure time/odometer arithmetic shared by the departure and maintenance
//! sweeps. The sweeps themselves live in the application layer; everything
//! here is deterministic in its inputs.

use chrono::{Days, NaiveDate, NaiveDateTime};

use crate::domain::trip::parse_time_of_day;

/// Fixed lookahead for the date-based maintenance reminders
/// (inspection/registration expiry).
pub const DATE_LOOKAHEAD_DAYS: u64 = 14;

/// Classification of an order's trip departure against "now".
///
/// Only `Within24h` dispatches. A departure inside the next 24 hours always
/// classifies as `Within24h`, taking precedence over the same-day/next-day
/// labels; `Today`/`Tomorrow` therefore only describe departures further out
/// than 24 hours (possible around day boundaries).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepartureWindow {
    /// Trip has no usable date
    Missing,
    /// Departure time string failed to parse
    Invalid,
    Past,
    Today,
    Tomorrow,
    Within24h,
    Future,
}

impl DepartureWindow {
    pub fn should_dispatch(&self) -> bool {
        matches!(self, Self::Within24h)
    }
}

/// Classify a trip departure against local `now`.
pub fn classify_departure(
    trip_date: Option<NaiveDate>,
    departure_time: &str,
    now: NaiveDateTime,
) -> DepartureWindow {
    let Some(date) = trip_date else {
        return DepartureWindow::Missing;
    };
    let Ok(time) = parse_time_of_day(departure_time) else {
        return DepartureWindow::Invalid;
    };
    let departure = date.and_time(time);

    if departure < now {
        return DepartureWindow::Past;
    }
    if departure <= now + chrono::Duration::hours(24) {
        return DepartureWindow::Within24h;
    }
    if date == now.date() {
        return DepartureWindow::Today;
    }
    if Some(date) == now.date().checked_add_days(Days::new(1)) {
        return DepartureWindow::Tomorrow;
    }
    DepartureWindow::Future
}

/// A vehicle due for odometer-based maintenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaintenanceDue {
    /// 1-based service cycle index, the de-dup watermark unit
    pub cycle: i64,
    pub threshold_km: i64,
    /// True when the reading sits just past the previous threshold rather
    /// than inside the pre-window of the next one
    pub overdue: bool,
}

/// Odometer check: `threshold = ceil(odometer / interval) * interval`, due
/// inside the tolerance window before the threshold, or in the overdue
/// window just after a missed threshold (until the reading moves past the
/// tolerance again).
pub fn odometer_due(odometer_km: i64, interval_km: i64, tolerance_km: i64) -> Option<MaintenanceDue> {
    if odometer_km <= 0 || interval_km <= 0 {
        return None;
    }
    let cycle = (odometer_km + interval_km - 1) / interval_km;
    let threshold = cycle * interval_km;

    if threshold - odometer_km <= tolerance_km {
        return Some(MaintenanceDue {
            cycle,
            threshold_km: threshold,
            overdue: false,
        });
    }

    let previous_threshold = threshold - interval_km;
    if cycle > 1 && odometer_km - previous_threshold <= tolerance_km {
        return Some(MaintenanceDue {
            cycle,
            threshold_km: threshold,
            overdue: true,
        });
    }

    None
}

/// Date-based check (inspection/registration expiry): due when the date
/// falls inside the fixed 14-day lookahead, overdue dates included.
pub fn date_due(due: Option<NaiveDate>, today: NaiveDate) -> bool {
    match due {
        Some(date) => date <= today + Days::new(DATE_LOOKAHEAD_DAYS),
        None => false,
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(h, min, 0).unwrap())
    }

    #[test]
    fn departure_in_23_hours_is_within_24h() {
        let now = at(2025, 3, 1, 10, 0);
        let window = classify_departure(
            NaiveDate::from_ymd_opt(2025, 3, 2),
            "09:00", // now + 23h
            now,
        );
        assert_eq!(window, DepartureWindow::Within24h);
        assert!(window.should_dispatch());
    }

    #[test]
    fn departure_in_48_hours_is_future() {
        let now = at(2025, 3, 1, 10, 0);
        let window = classify_departure(NaiveDate::from_ymd_opt(2025, 3, 3), "10:00", now);
        assert_eq!(window, DepartureWindow::Future);
        assert!(!window.should_dispatch());
    }

    #[test]
    fn past_departure_never_dispatches() {
        let now = at(2025, 3, 1, 10, 0);
        let window = classify_departure(NaiveDate::from_ymd_opt(2025, 3, 1), "08:00", now);
        assert_eq!(window, DepartureWindow::Past);
    }

    #[test]
    fn tomorrow_beyond_24h_is_tomorrow() {
        let now = at(2025, 3, 1, 6, 0);
        // Next day 08:00 is 26 hours ahead.
        let window = classify_departure(NaiveDate::from_ymd_opt(2025, 3, 2), "08:00", now);
        assert_eq!(window, DepartureWindow::Tomorrow);
    }

    #[test]
    fn missing_and_invalid_inputs() {
        let now = at(2025, 3, 1, 10, 0);
        assert_eq!(
            classify_departure(None, "08:00", now),
            DepartureWindow::Missing
        );
        assert_eq!(
            classify_departure(NaiveDate::from_ymd_opt(2025, 3, 2), "late", now),
            DepartureWindow::Invalid
        );
    }

    #[test]
    fn odometer_pre_window() {
        // 9_600 of a 10_000 interval with 500 tolerance: approaching cycle 1.
        let due = odometer_due(9_600, 10_000, 500).unwrap();
        assert_eq!(due.cycle, 1);
        assert_eq!(due.threshold_km, 10_000);
        assert!(!due.overdue);

        // Exactly on the threshold still counts.
        let exact = odometer_due(10_000, 10_000, 500).unwrap();
        assert_eq!(exact.cycle, 1);
    }

    #[test]
    fn odometer_overdue_window() {
        // Just past 10_000 without service: overdue, counted against the
        // next cycle index so the watermark advances.
        let due = odometer_due(10_200, 10_000, 500).unwrap();
        assert_eq!(due.cycle, 2);
        assert!(due.overdue);
    }

    #[test]
    fn odometer_mid_cycle_is_not_due() {
        assert_eq!(odometer_due(15_000, 10_000, 500), None);
        assert_eq!(odometer_due(0, 10_000, 500), None);
        assert_eq!(odometer_due(5_000, 0, 500), None);
    }

    #[test]
    fn date_due_uses_fixed_lookahead() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert!(date_due(NaiveDate::from_ymd_opt(2025, 3, 10), today));
        assert!(date_due(NaiveDate::from_ymd_opt(2025, 3, 15), today)); // day 14
        assert!(!date_due(NaiveDate::from_ymd_opt(2025, 3, 16), today));
        assert!(date_due(NaiveDate::from_ymd_opt(2025, 2, 1), today)); // overdue
        assert!(!date_due(None, today));
    }
}
