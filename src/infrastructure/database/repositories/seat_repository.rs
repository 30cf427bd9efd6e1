//! SeaORM implementation of SeatRepository
//!
//! Seat writes go through compare-and-swap updates filtered on status and
//! version; a zero row count means another writer got there first.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Value};

use crate::domain::seat::{Seat, SeatRepository, SeatStatus};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::trip_seat;

pub struct SeaOrmSeatRepository {
    db: DatabaseConnection,
}

impl SeaOrmSeatRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn seat_to_domain(m: trip_seat::Model) -> Seat {
    Seat {
        id: m.id,
        trip_id: m.trip_id,
        code: m.code,
        row: m.row,
        column: m.column,
        is_avail: m.is_avail,
        status: SeatStatus::from_str(&m.status),
        hold_expires_at: m.hold_expires_at,
        version: m.version,
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Validation(format!("Database error: {}", e))
}

// ── SeatRepository impl ─────────────────────────────────────────

#[async_trait]
impl SeatRepository for SeaOrmSeatRepository {
    async fn list_for_trip(&self, trip_id: i32) -> DomainResult<Vec<Seat>> {
        let models = trip_seat::Entity::find()
            .filter(trip_seat::Column::TripId.eq(trip_id))
            .order_by_asc(trip_seat::Column::Row)
            .order_by_asc(trip_seat::Column::Column)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(seat_to_domain).collect())
    }

    async fn find_expired_holds(&self, now: DateTime<Utc>) -> DomainResult<Vec<Seat>> {
        let models = trip_seat::Entity::find()
            .filter(trip_seat::Column::Status.eq(SeatStatus::OnHold.as_str()))
            .filter(trip_seat::Column::HoldExpiresAt.lt(now))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(seat_to_domain).collect())
    }

    async fn release(&self, seat_id: i32, expected_version: i32) -> DomainResult<bool> {
        debug!("Releasing seat {} (version {})", seat_id, expected_version);

        let result = trip_seat::Entity::update_many()
            .col_expr(
                trip_seat::Column::Status,
                Expr::value(SeatStatus::Available.as_str()),
            )
            .col_expr(trip_seat::Column::IsAvail, Expr::value(true))
            .col_expr(
                trip_seat::Column::HoldExpiresAt,
                Expr::value(Value::ChronoDateTimeUtc(None)),
            )
            .col_expr(trip_seat::Column::Version, Expr::value(expected_version + 1))
            .filter(trip_seat::Column::Id.eq(seat_id))
            .filter(trip_seat::Column::Status.eq(SeatStatus::OnHold.as_str()))
            .filter(trip_seat::Column::Version.eq(expected_version))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected > 0)
    }
}
