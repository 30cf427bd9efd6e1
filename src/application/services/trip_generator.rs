//! Trip generation from schedule templates
//!
//! Materializes sellable trips for one route over a span of days. Each day
//! whose weekday has an active schedule contributes one trip per leg, with
//! seat inventory cloned from the vehicle's seat map and the waypoint list
//! frozen from the leg's stop list. Days without a schedule are skipped;
//! re-running over the same span is a no-op for days already generated.

use chrono::{Days, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::{info, warn};

use crate::domain::schedule::{weekday_index, ScheduleLeg, ScheduleStop};
use crate::domain::trip::{duration_hours, TripStatus};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{
    driver, schedule, schedule_leg, schedule_stop, stop, trip, trip_point, trip_seat, vehicle,
    vehicle_seat,
};
use crate::shared::codes;

/// Outcome counters for one generation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationSummary {
    pub trips_created: usize,
    /// Days in the span with no active schedule, or already generated
    pub days_skipped: usize,
}

pub struct TripGenerator {
    db: DatabaseConnection,
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Validation(format!("Database error: {}", e))
}

impl TripGenerator {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Generate trips for `route_id` on every day offset `0..=days` from
    /// `start_date` whose weekday has an active schedule.
    ///
    /// One transaction covers the whole run; a failure in any leg rolls the
    /// entire span back to untouched.
    pub async fn generate(
        &self,
        route_id: i32,
        start_date: NaiveDate,
        days: u32,
    ) -> DomainResult<GenerationSummary> {
        let mut summary = GenerationSummary::default();
        let txn = self.db.begin().await.map_err(db_err)?;

        for offset in 0..=days {
            let date = start_date
                .checked_add_days(Days::new(offset as u64))
                .ok_or_else(|| {
                    DomainError::Validation(format!(
                        "date range overflows past {start_date} + {offset} days"
                    ))
                })?;
            let weekday = weekday_index(date);

            let sched = schedule::Entity::find()
                .filter(schedule::Column::RouteId.eq(route_id))
                .filter(schedule::Column::Weekday.eq(weekday))
                .filter(schedule::Column::IsActive.eq(true))
                .filter(schedule::Column::DeletedAt.is_null())
                .one(&txn)
                .await
                .map_err(db_err)?;
            let Some(sched) = sched else {
                summary.days_skipped += 1;
                continue;
            };

            // Idempotency: a day that already has trips for this route was
            // generated by an earlier run.
            let existing = trip::Entity::find()
                .filter(trip::Column::RouteId.eq(route_id))
                .filter(trip::Column::Date.eq(date))
                .filter(trip::Column::DeletedAt.is_null())
                .one(&txn)
                .await
                .map_err(db_err)?;
            if existing.is_some() {
                summary.days_skipped += 1;
                continue;
            }

            let legs = schedule_leg::Entity::find()
                .filter(schedule_leg::Column::ScheduleId.eq(sched.id))
                .order_by_asc(schedule_leg::Column::Sort)
                .all(&txn)
                .await
                .map_err(db_err)?;

            // One manifest code per direction per date; every leg of the
            // same direction shares it.
            let mut outbound_manifest: Option<String> = None;
            let mut return_manifest: Option<String> = None;

            for leg in legs {
                let manifest = if leg.is_round {
                    return_manifest
                        .get_or_insert_with(|| codes::manifest_code(date))
                        .clone()
                } else {
                    outbound_manifest
                        .get_or_insert_with(|| codes::manifest_code(date))
                        .clone()
                };

                self.create_trip_for_leg(&txn, &sched, &leg, date, manifest)
                    .await?;
                summary.trips_created += 1;
            }
        }

        txn.commit().await.map_err(db_err)?;

        info!(
            route_id,
            %start_date,
            days,
            created = summary.trips_created,
            skipped = summary.days_skipped,
            "🚌 Trip generation complete"
        );
        Ok(summary)
    }

    async fn create_trip_for_leg(
        &self,
        txn: &sea_orm::DatabaseTransaction,
        sched: &schedule::Model,
        leg: &schedule_leg::Model,
        date: NaiveDate,
        spj_code: String,
    ) -> DomainResult<()> {
        let stops = schedule_stop::Entity::find()
            .filter(schedule_stop::Column::LegId.eq(leg.id))
            .order_by_asc(schedule_stop::Column::Sort)
            .all(txn)
            .await
            .map_err(db_err)?;

        let template = ScheduleLeg {
            id: leg.id,
            schedule_id: leg.schedule_id,
            sort: leg.sort,
            is_round: leg.is_round,
            departure_stop_id: leg.departure_stop_id,
            arrival_stop_id: leg.arrival_stop_id,
            price: leg.price,
            vehicle_id: leg.vehicle_id,
            driver_id: leg.driver_id,
        };
        let stop_list: Vec<ScheduleStop> = stops
            .iter()
            .map(|s| ScheduleStop {
                id: s.id,
                leg_id: s.leg_id,
                stop_id: s.stop_id,
                depart_time: s.depart_time.clone(),
                sort: s.sort,
            })
            .collect();
        let (departure_wp, arrival_wp) = template.resolve_waypoints(&stop_list)?;

        let duration = duration_hours(&departure_wp.depart_time, &arrival_wp.depart_time)?;
        let departure_time = departure_wp.depart_time.clone();
        let arrival_time = arrival_wp.depart_time.clone();

        let departure_stop = find_stop(txn, leg.departure_stop_id).await?;
        let arrival_stop = find_stop(txn, leg.arrival_stop_id).await?;

        let veh = vehicle::Entity::find_by_id(leg.vehicle_id)
            .one(txn)
            .await
            .map_err(db_err)?
            .ok_or(DomainError::NotFound {
                entity: "Vehicle",
                field: "id",
                value: leg.vehicle_id.to_string(),
            })?;
        let drv = driver::Entity::find_by_id(leg.driver_id)
            .one(txn)
            .await
            .map_err(db_err)?
            .ok_or(DomainError::NotFound {
                entity: "Driver",
                field: "id",
                value: leg.driver_id.to_string(),
            })?;

        let seat_map = vehicle_seat::Entity::find()
            .filter(vehicle_seat::Column::VehicleId.eq(veh.id))
            .order_by_asc(vehicle_seat::Column::Row)
            .order_by_asc(vehicle_seat::Column::Column)
            .all(txn)
            .await
            .map_err(db_err)?;

        if seat_map.is_empty() {
            warn!(vehicle_id = veh.id, "Vehicle has no seat map, skipping leg");
            return Err(DomainError::Validation(format!(
                "vehicle {} has no seat map",
                veh.id
            )));
        }

        let now = Utc::now();
        let new_trip = trip::ActiveModel {
            code: Set(codes::trip_code(date)),
            spj_code: Set(spj_code),
            route_id: Set(sched.route_id),
            date: Set(date),
            sort: Set(leg.sort),
            departure_stop_id: Set(departure_stop.id),
            departure_stop_name: Set(departure_stop.name),
            departure_city: Set(departure_stop.city),
            arrival_stop_id: Set(arrival_stop.id),
            arrival_stop_name: Set(arrival_stop.name),
            arrival_city: Set(arrival_stop.city),
            departure_time: Set(departure_time),
            arrival_time: Set(arrival_time),
            duration_hours: Set(duration),
            capacity: Set(seat_map.len() as i32),
            ticket_sold: Set(0),
            base_price: Set(leg.price),
            vehicle_id: Set(veh.id),
            vehicle_name: Set(veh.name),
            plate_number: Set(veh.plate_number),
            driver_id: Set(drv.id),
            driver_code: Set(drv.code),
            driver_name: Set(drv.name),
            status: Set(TripStatus::Pending.as_str().to_string()),
            actual_departure_at: Set(None),
            actual_arrival_at: Set(None),
            created_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };
        let inserted = new_trip.insert(txn).await.map_err(db_err)?;

        let seats: Vec<trip_seat::ActiveModel> = seat_map
            .iter()
            .map(|s| trip_seat::ActiveModel {
                trip_id: Set(inserted.id),
                code: Set(s.code.clone()),
                row: Set(s.row),
                column: Set(s.column),
                is_avail: Set(true),
                status: Set("AVAILABLE".to_string()),
                hold_expires_at: Set(None),
                version: Set(0),
                created_at: Set(now),
                ..Default::default()
            })
            .collect();
        trip_seat::Entity::insert_many(seats)
            .exec(txn)
            .await
            .map_err(db_err)?;

        // Snapshot stop names/cities onto the waypoints.
        let stop_ids: Vec<i32> = stops.iter().map(|s| s.stop_id).collect();
        let stop_rows = stop::Entity::find()
            .filter(stop::Column::Id.is_in(stop_ids))
            .all(txn)
            .await
            .map_err(db_err)?;

        let mut points = Vec::with_capacity(stops.len());
        for s in &stops {
            let master = stop_rows.iter().find(|r| r.id == s.stop_id).ok_or(
                DomainError::NotFound {
                    entity: "Stop",
                    field: "id",
                    value: s.stop_id.to_string(),
                },
            )?;
            points.push(trip_point::ActiveModel {
                trip_id: Set(inserted.id),
                stop_id: Set(s.stop_id),
                stop_name: Set(master.name.clone()),
                city: Set(master.city.clone()),
                depart_time: Set(s.depart_time.clone()),
                sort: Set(s.sort),
                created_at: Set(now),
                ..Default::default()
            });
        }
        trip_point::Entity::insert_many(points)
            .exec(txn)
            .await
            .map_err(db_err)?;

        Ok(())
    }
}

async fn find_stop(
    txn: &sea_orm::DatabaseTransaction,
    stop_id: i32,
) -> DomainResult<stop::Model> {
    stop::Entity::find_by_id(stop_id)
        .one(txn)
        .await
        .map_err(db_err)?
        .ok_or(DomainError::NotFound {
            entity: "Stop",
            field: "id",
            value: stop_id.to_string(),
        })
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::{
        seed_driver, seed_schedule, seed_stops, seed_vehicle, test_db,
    };

    // 2025-03-03 is a Monday.
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()
    }

    #[tokio::test]
    async fn generation_is_scoped_to_the_requested_route() {
        let db = test_db().await;
        let (stop_a, stop_b) = seed_stops(&db).await;
        let vehicle_id = seed_vehicle(&db, 4).await;
        let driver_id = seed_driver(&db).await;
        seed_schedule(&db, 1, 0, vehicle_id, driver_id, stop_a, stop_b, &[false]).await;
        seed_schedule(&db, 2, 0, vehicle_id, driver_id, stop_a, stop_b, &[false]).await;

        let generator = TripGenerator::new(db.clone());
        let summary = generator.generate(1, monday(), 0).await.unwrap();
        assert_eq!(summary.trips_created, 1);
        assert_eq!(summary.days_skipped, 0);

        let trips = trip::Entity::find().all(&db).await.unwrap();
        assert_eq!(trips.len(), 1);
        assert!(trips.iter().all(|t| t.route_id == 1));
        assert_eq!(trips[0].capacity, 4);

        let seats = trip_seat::Entity::find().all(&db).await.unwrap();
        assert_eq!(seats.len(), 4);
    }

    #[tokio::test]
    async fn span_covers_every_matching_weekday_and_skips_the_rest() {
        let db = test_db().await;
        let (stop_a, stop_b) = seed_stops(&db).await;
        let vehicle_id = seed_vehicle(&db, 2).await;
        let driver_id = seed_driver(&db).await;
        seed_schedule(&db, 1, 0, vehicle_id, driver_id, stop_a, stop_b, &[false]).await;

        // Monday through next Monday: offsets 0 and 7 match the schedule.
        let generator = TripGenerator::new(db.clone());
        let summary = generator.generate(1, monday(), 7).await.unwrap();
        assert_eq!(summary.trips_created, 2);
        assert_eq!(summary.days_skipped, 6);

        let trips = trip::Entity::find().all(&db).await.unwrap();
        let dates: Vec<NaiveDate> = trips.iter().map(|t| t.date).collect();
        assert!(dates.contains(&monday()));
        assert!(dates.contains(&NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()));
    }

    #[tokio::test]
    async fn rerun_skips_already_generated_days() {
        let db = test_db().await;
        let (stop_a, stop_b) = seed_stops(&db).await;
        let vehicle_id = seed_vehicle(&db, 2).await;
        let driver_id = seed_driver(&db).await;
        seed_schedule(&db, 1, 0, vehicle_id, driver_id, stop_a, stop_b, &[false]).await;

        let generator = TripGenerator::new(db.clone());
        let first = generator.generate(1, monday(), 0).await.unwrap();
        assert_eq!(first.trips_created, 1);

        let second = generator.generate(1, monday(), 0).await.unwrap();
        assert_eq!(second.trips_created, 0);
        assert_eq!(second.days_skipped, 1);

        let trips = trip::Entity::find().all(&db).await.unwrap();
        assert_eq!(trips.len(), 1);
    }

    #[tokio::test]
    async fn manifest_codes_group_by_direction() {
        let db = test_db().await;
        let (stop_a, stop_b) = seed_stops(&db).await;
        let vehicle_id = seed_vehicle(&db, 2).await;
        let driver_id = seed_driver(&db).await;
        // Outbound leg plus two return legs on the same schedule.
        seed_schedule(
            &db,
            1,
            0,
            vehicle_id,
            driver_id,
            stop_a,
            stop_b,
            &[false, true, true],
        )
        .await;

        let generator = TripGenerator::new(db.clone());
        let summary = generator.generate(1, monday(), 0).await.unwrap();
        assert_eq!(summary.trips_created, 3);

        let trips = trip::Entity::find()
            .order_by_asc(trip::Column::Sort)
            .all(&db)
            .await
            .unwrap();
        assert_eq!(trips[1].spj_code, trips[2].spj_code);
        assert_ne!(trips[0].spj_code, trips[1].spj_code);
    }

    #[tokio::test]
    async fn day_without_schedule_is_skipped_not_an_error() {
        let db = test_db().await;
        let generator = TripGenerator::new(db.clone());
        // Nothing seeded at all.
        let summary = generator.generate(9, monday(), 2).await.unwrap();
        assert_eq!(summary.trips_created, 0);
        assert_eq!(summary.days_skipped, 3);
    }
}
