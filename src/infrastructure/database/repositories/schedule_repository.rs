//! SeaORM implementation of ScheduleRepository

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::domain::schedule::{Schedule, ScheduleLeg, ScheduleRepository, ScheduleStop, Stop};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{schedule, schedule_leg, schedule_stop, stop};

pub struct SeaOrmScheduleRepository {
    db: DatabaseConnection,
}

impl SeaOrmScheduleRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn schedule_to_domain(m: schedule::Model) -> Schedule {
    Schedule {
        id: m.id,
        route_id: m.route_id,
        weekday: m.weekday,
        is_active: m.is_active,
    }
}

fn leg_to_domain(m: schedule_leg::Model) -> ScheduleLeg {
    ScheduleLeg {
        id: m.id,
        schedule_id: m.schedule_id,
        sort: m.sort,
        is_round: m.is_round,
        departure_stop_id: m.departure_stop_id,
        arrival_stop_id: m.arrival_stop_id,
        price: m.price,
        vehicle_id: m.vehicle_id,
        driver_id: m.driver_id,
    }
}

fn stop_entry_to_domain(m: schedule_stop::Model) -> ScheduleStop {
    ScheduleStop {
        id: m.id,
        leg_id: m.leg_id,
        stop_id: m.stop_id,
        depart_time: m.depart_time,
        sort: m.sort,
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Validation(format!("Database error: {}", e))
}

// ── ScheduleRepository impl ─────────────────────────────────────

#[async_trait]
impl ScheduleRepository for SeaOrmScheduleRepository {
    async fn find_active(&self, route_id: i32, weekday: i32) -> DomainResult<Option<Schedule>> {
        let model = schedule::Entity::find()
            .filter(schedule::Column::RouteId.eq(route_id))
            .filter(schedule::Column::Weekday.eq(weekday))
            .filter(schedule::Column::IsActive.eq(true))
            .filter(schedule::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(schedule_to_domain))
    }

    async fn legs(&self, schedule_id: i32) -> DomainResult<Vec<ScheduleLeg>> {
        let models = schedule_leg::Entity::find()
            .filter(schedule_leg::Column::ScheduleId.eq(schedule_id))
            .order_by_asc(schedule_leg::Column::Sort)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(leg_to_domain).collect())
    }

    async fn stops_for_leg(&self, leg_id: i32) -> DomainResult<Vec<ScheduleStop>> {
        let models = schedule_stop::Entity::find()
            .filter(schedule_stop::Column::LegId.eq(leg_id))
            .order_by_asc(schedule_stop::Column::Sort)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(stop_entry_to_domain).collect())
    }

    async fn find_stop(&self, stop_id: i32) -> DomainResult<Option<Stop>> {
        let model = stop::Entity::find_by_id(stop_id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(|m| Stop {
            id: m.id,
            name: m.name,
            city: m.city,
        }))
    }
}
