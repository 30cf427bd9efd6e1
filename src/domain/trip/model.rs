//! Trip domain entity
//!
//! One dated, directional departure instance generated from a schedule
//! template. Display fields are denormalized snapshots taken at generation
//! time so later master-data edits never change issued trips.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::domain::{DomainError, DomainResult};

/// Trip lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripStatus {
    Pending,
    Ongoing,
    Completed,
    Cancelled,
}

impl TripStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Ongoing => "ONGOING",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "ONGOING" => Self::Ongoing,
            "COMPLETED" => Self::Completed,
            "CANCELLED" => Self::Cancelled,
            _ => Self::Pending,
        }
    }
}

impl std::fmt::Display for TripStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Snapshot of one stop on a trip's route, frozen at generation time.
#[derive(Debug, Clone)]
pub struct TripPoint {
    pub id: i32,
    pub trip_id: i32,
    pub stop_id: i32,
    pub stop_name: String,
    pub city: String,
    /// Scheduled departure time-of-day ("HH:MM"); arrival display times are
    /// computed later from the trip duration
    pub depart_time: String,
    pub sort: i32,
}

/// One concrete dated trip
#[derive(Debug, Clone)]
pub struct Trip {
    pub id: i32,
    pub code: String,
    /// Manifest code shared by every leg of the same direction on the same
    /// date (consolidated trip-sheet reporting)
    pub spj_code: String,
    pub route_id: i32,
    pub date: NaiveDate,
    /// Position of this stop-pair within the round's waypoint sequence
    pub sort: i32,
    pub departure_stop_id: i32,
    pub departure_stop_name: String,
    pub departure_city: String,
    pub arrival_stop_id: i32,
    pub arrival_stop_name: String,
    pub arrival_city: String,
    /// Scheduled time-of-day strings ("HH:MM")
    pub departure_time: String,
    pub arrival_time: String,
    /// Whole hours, rounded up
    pub duration_hours: i64,
    pub capacity: i32,
    pub ticket_sold: i32,
    /// Base fare in minor currency units
    pub base_price: i64,
    pub vehicle_id: i32,
    pub vehicle_name: String,
    pub vehicle_plate: String,
    pub driver_id: i32,
    pub driver_code: String,
    pub driver_name: String,
    pub status: TripStatus,
    pub actual_departure_at: Option<DateTime<Utc>>,
    pub actual_arrival_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Trip {
    /// Apply a lifecycle transition, stamping actual departure/arrival.
    pub fn transition(&mut self, to: TripStatus, now: DateTime<Utc>) {
        match to {
            TripStatus::Ongoing if self.actual_departure_at.is_none() => {
                self.actual_departure_at = Some(now);
            }
            TripStatus::Completed if self.actual_arrival_at.is_none() => {
                self.actual_arrival_at = Some(now);
            }
            _ => {}
        }
        self.status = to;
    }

    pub fn seats_remaining(&self) -> i32 {
        self.capacity - self.ticket_sold
    }
}

/// Parse a "HH:MM" time-of-day string.
pub fn parse_time_of_day(s: &str) -> DomainResult<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .map_err(|_| DomainError::Validation(format!("invalid time of day: {s}")))
}

/// Compute trip duration in whole hours, rounded up.
///
/// Arrival earlier than or equal to departure means the arrival falls on
/// the next calendar day.
pub fn duration_hours(departure: &str, arrival: &str) -> DomainResult<i64> {
    let dep = parse_time_of_day(departure)?;
    let arr = parse_time_of_day(arrival)?;

    let mut minutes = (arr - dep).num_minutes();
    if minutes <= 0 {
        minutes += 24 * 60;
    }
    Ok((minutes + 59) / 60)
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_rounds_up() {
        assert_eq!(duration_hours("08:00", "10:15").unwrap(), 3);
        assert_eq!(duration_hours("08:00", "10:00").unwrap(), 2);
        assert_eq!(duration_hours("08:00", "08:01").unwrap(), 1);
    }

    #[test]
    fn overnight_arrival_treated_as_next_day() {
        assert_eq!(duration_hours("23:30", "01:00").unwrap(), 2);
        // Equal times mean a full 24h loop, not zero.
        assert_eq!(duration_hours("06:00", "06:00").unwrap(), 24);
    }

    #[test]
    fn bad_time_string_is_validation_error() {
        assert!(matches!(
            duration_hours("25:99", "10:00"),
            Err(DomainError::Validation(_))
        ));
        assert!(duration_hours("8am", "10:00").is_err());
    }

    #[test]
    fn status_roundtrip() {
        for s in [
            TripStatus::Pending,
            TripStatus::Ongoing,
            TripStatus::Completed,
            TripStatus::Cancelled,
        ] {
            assert_eq!(TripStatus::from_str(s.as_str()), s);
        }
        assert_eq!(TripStatus::from_str("garbage"), TripStatus::Pending);
    }

    fn sample_trip() -> Trip {
        Trip {
            id: 1,
            code: "TRP-20250301-ABC123".into(),
            spj_code: "SPJ-20250301-XYZ789".into(),
            route_id: 7,
            date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            sort: 0,
            departure_stop_id: 1,
            departure_stop_name: "Terminal A".into(),
            departure_city: "Jakarta".into(),
            arrival_stop_id: 2,
            arrival_stop_name: "Terminal B".into(),
            arrival_city: "Bandung".into(),
            departure_time: "08:00".into(),
            arrival_time: "11:00".into(),
            duration_hours: 3,
            capacity: 12,
            ticket_sold: 0,
            base_price: 150_000,
            vehicle_id: 1,
            vehicle_name: "Bus 01".into(),
            vehicle_plate: "B 1234 CD".into(),
            driver_id: 1,
            driver_code: "DRV-01".into(),
            driver_name: "Budi".into(),
            status: TripStatus::Pending,
            actual_departure_at: None,
            actual_arrival_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn ongoing_stamps_actual_departure_once() {
        let mut trip = sample_trip();
        let t1 = Utc::now();
        trip.transition(TripStatus::Ongoing, t1);
        assert_eq!(trip.actual_departure_at, Some(t1));

        let t2 = t1 + chrono::Duration::minutes(5);
        trip.transition(TripStatus::Ongoing, t2);
        assert_eq!(trip.actual_departure_at, Some(t1), "stamp must not move");
    }

    #[test]
    fn completed_stamps_actual_arrival() {
        let mut trip = sample_trip();
        let now = Utc::now();
        trip.transition(TripStatus::Completed, now);
        assert_eq!(trip.status, TripStatus::Completed);
        assert_eq!(trip.actual_arrival_at, Some(now));
        assert!(trip.actual_departure_at.is_none());
    }
}
