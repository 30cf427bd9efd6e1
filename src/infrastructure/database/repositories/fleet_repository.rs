//! SeaORM implementation of FleetRepository

use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::domain::fleet::{FleetRepository, Vehicle};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::vehicle;

pub struct SeaOrmFleetRepository {
    db: DatabaseConnection,
}

impl SeaOrmFleetRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn vehicle_to_domain(m: vehicle::Model) -> Vehicle {
    Vehicle {
        id: m.id,
        name: m.name,
        plate_number: m.plate_number,
        capacity: m.capacity,
        odometer_km: m.odometer_km,
        service_interval_km: m.service_interval_km,
        service_cycle_notified: m.service_cycle_notified,
        inspection_due: m.inspection_due,
        registration_due: m.registration_due,
        inspection_notified_for: m.inspection_notified_for,
        registration_notified_for: m.registration_notified_for,
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Validation(format!("Database error: {}", e))
}

// ── FleetRepository impl ────────────────────────────────────────

#[async_trait]
impl FleetRepository for SeaOrmFleetRepository {
    async fn list_vehicles(&self) -> DomainResult<Vec<Vehicle>> {
        let models = vehicle::Entity::find()
            .filter(vehicle::Column::DeletedAt.is_null())
            .order_by_asc(vehicle::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(vehicle_to_domain).collect())
    }

    async fn set_service_notified(&self, vehicle_id: i32, cycle: i64) -> DomainResult<()> {
        debug!("Vehicle {} service watermark -> cycle {}", vehicle_id, cycle);

        vehicle::Entity::update_many()
            .col_expr(vehicle::Column::ServiceCycleNotified, Expr::value(cycle))
            .filter(vehicle::Column::Id.eq(vehicle_id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn set_inspection_notified(&self, vehicle_id: i32, due: NaiveDate) -> DomainResult<()> {
        vehicle::Entity::update_many()
            .col_expr(vehicle::Column::InspectionNotifiedFor, Expr::value(due))
            .filter(vehicle::Column::Id.eq(vehicle_id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn set_registration_notified(&self, vehicle_id: i32, due: NaiveDate) -> DomainResult<()> {
        vehicle::Entity::update_many()
            .col_expr(vehicle::Column::RegistrationNotifiedFor, Expr::value(due))
            .filter(vehicle::Column::Id.eq(vehicle_id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}
