//! SeaORM implementation of TripRepository

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::trip::{Trip, TripPoint, TripRepository, TripStatus};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{trip, trip_point};

pub struct SeaOrmTripRepository {
    db: DatabaseConnection,
}

impl SeaOrmTripRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn trip_to_domain(m: trip::Model) -> Trip {
    Trip {
        id: m.id,
        code: m.code,
        spj_code: m.spj_code,
        route_id: m.route_id,
        date: m.date,
        sort: m.sort,
        departure_stop_id: m.departure_stop_id,
        departure_stop_name: m.departure_stop_name,
        departure_city: m.departure_city,
        arrival_stop_id: m.arrival_stop_id,
        arrival_stop_name: m.arrival_stop_name,
        arrival_city: m.arrival_city,
        departure_time: m.departure_time,
        arrival_time: m.arrival_time,
        duration_hours: m.duration_hours,
        capacity: m.capacity,
        ticket_sold: m.ticket_sold,
        base_price: m.base_price,
        vehicle_id: m.vehicle_id,
        vehicle_name: m.vehicle_name,
        vehicle_plate: m.plate_number,
        driver_id: m.driver_id,
        driver_code: m.driver_code,
        driver_name: m.driver_name,
        status: TripStatus::from_str(&m.status),
        actual_departure_at: m.actual_departure_at,
        actual_arrival_at: m.actual_arrival_at,
        created_at: m.created_at,
    }
}

fn point_to_domain(m: trip_point::Model) -> TripPoint {
    TripPoint {
        id: m.id,
        trip_id: m.trip_id,
        stop_id: m.stop_id,
        stop_name: m.stop_name,
        city: m.city,
        depart_time: m.depart_time,
        sort: m.sort,
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Validation(format!("Database error: {}", e))
}

// ── TripRepository impl ─────────────────────────────────────────

#[async_trait]
impl TripRepository for SeaOrmTripRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Trip>> {
        let model = trip::Entity::find_by_id(id)
            .filter(trip::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(trip_to_domain))
    }

    async fn list(
        &self,
        route_id: Option<i32>,
        date: Option<NaiveDate>,
    ) -> DomainResult<Vec<Trip>> {
        let mut query = trip::Entity::find().filter(trip::Column::DeletedAt.is_null());
        if let Some(route_id) = route_id {
            query = query.filter(trip::Column::RouteId.eq(route_id));
        }
        if let Some(date) = date {
            query = query.filter(trip::Column::Date.eq(date));
        }
        let models = query
            .order_by_asc(trip::Column::Date)
            .order_by_asc(trip::Column::Sort)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(trip_to_domain).collect())
    }

    async fn update_status(
        &self,
        id: i32,
        status: TripStatus,
        actual_departure_at: Option<DateTime<Utc>>,
        actual_arrival_at: Option<DateTime<Utc>>,
    ) -> DomainResult<()> {
        debug!("Updating trip {} status to {}", id, status);

        let existing = trip::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            return Err(DomainError::NotFound {
                entity: "Trip",
                field: "id",
                value: id.to_string(),
            });
        };

        let mut active: trip::ActiveModel = existing.into();
        active.status = Set(status.as_str().to_string());
        if let Some(at) = actual_departure_at {
            active.actual_departure_at = Set(Some(at));
        }
        if let Some(at) = actual_arrival_at {
            active.actual_arrival_at = Set(Some(at));
        }
        active.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn points(&self, trip_id: i32) -> DomainResult<Vec<TripPoint>> {
        let models = trip_point::Entity::find()
            .filter(trip_point::Column::TripId.eq(trip_id))
            .order_by_asc(trip_point::Column::Sort)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(point_to_domain).collect())
    }
}
