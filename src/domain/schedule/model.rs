//! Schedule registry domain entities
//!
//! Recurring route templates, read-only from this core's perspective. A
//! schedule matches one (route, weekday); its legs each describe one
//! directional departure with an ordered stop list.

use chrono::{Datelike, NaiveDate};

use crate::domain::{DomainError, DomainResult};

/// A stop in the master data (name/city are snapshotted onto trips).
#[derive(Debug, Clone)]
pub struct Stop {
    pub id: i32,
    pub name: String,
    pub city: String,
}

/// One recurring template row for a (route, weekday) pair.
#[derive(Debug, Clone)]
pub struct Schedule {
    pub id: i32,
    pub route_id: i32,
    /// 0 = Monday .. 6 = Sunday
    pub weekday: i32,
    pub is_active: bool,
}

/// Weekday index for a calendar date, matching `Schedule::weekday`.
pub fn weekday_index(date: NaiveDate) -> i32 {
    date.weekday().num_days_from_monday() as i32
}

/// One directional leg of a schedule.
#[derive(Debug, Clone)]
pub struct ScheduleLeg {
    pub id: i32,
    pub schedule_id: i32,
    /// Position of this leg within the round's waypoint sequence
    pub sort: i32,
    /// Legs sharing `is_round` on the same date share one manifest code
    pub is_round: bool,
    pub departure_stop_id: i32,
    pub arrival_stop_id: i32,
    /// Base fare in minor currency units
    pub price: i64,
    pub vehicle_id: i32,
    pub driver_id: i32,
}

/// One stop of a leg's ordered stop list with its scheduled local time.
#[derive(Debug, Clone)]
pub struct ScheduleStop {
    pub id: i32,
    pub leg_id: i32,
    pub stop_id: i32,
    /// "HH:MM"
    pub depart_time: String,
    pub sort: i32,
}

impl ScheduleLeg {
    /// Resolve the leg's departure and arrival waypoints by matching the
    /// declared stop ids against the ordered stop list.
    pub fn resolve_waypoints<'a>(
        &self,
        stops: &'a [ScheduleStop],
    ) -> DomainResult<(&'a ScheduleStop, &'a ScheduleStop)> {
        let departure = stops
            .iter()
            .find(|s| s.stop_id == self.departure_stop_id)
            .ok_or_else(|| {
                DomainError::Validation(format!(
                    "leg {} has no waypoint for departure stop {}",
                    self.id, self.departure_stop_id
                ))
            })?;
        let arrival = stops
            .iter()
            .find(|s| s.stop_id == self.arrival_stop_id)
            .ok_or_else(|| {
                DomainError::Validation(format!(
                    "leg {} has no waypoint for arrival stop {}",
                    self.id, self.arrival_stop_id
                ))
            })?;
        Ok((departure, arrival))
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn stop(leg_id: i32, stop_id: i32, time: &str, sort: i32) -> ScheduleStop {
        ScheduleStop {
            id: sort,
            leg_id,
            stop_id,
            depart_time: time.to_string(),
            sort,
        }
    }

    #[test]
    fn waypoints_resolve_by_stop_id() {
        let leg = ScheduleLeg {
            id: 1,
            schedule_id: 1,
            sort: 0,
            is_round: true,
            departure_stop_id: 10,
            arrival_stop_id: 30,
            price: 100_000,
            vehicle_id: 1,
            driver_id: 1,
        };
        let stops = vec![
            stop(1, 10, "08:00", 0),
            stop(1, 20, "09:15", 1),
            stop(1, 30, "10:30", 2),
        ];
        let (dep, arr) = leg.resolve_waypoints(&stops).unwrap();
        assert_eq!(dep.depart_time, "08:00");
        assert_eq!(arr.depart_time, "10:30");
    }

    #[test]
    fn missing_waypoint_is_validation_error() {
        let leg = ScheduleLeg {
            id: 1,
            schedule_id: 1,
            sort: 0,
            is_round: false,
            departure_stop_id: 10,
            arrival_stop_id: 99,
            price: 0,
            vehicle_id: 1,
            driver_id: 1,
        };
        let stops = vec![stop(1, 10, "08:00", 0)];
        assert!(matches!(
            leg.resolve_waypoints(&stops),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn weekday_index_is_monday_based() {
        // 2025-03-03 is a Monday
        assert_eq!(weekday_index(NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()), 0);
        assert_eq!(weekday_index(NaiveDate::from_ymd_opt(2025, 3, 9).unwrap()), 6);
    }
}
