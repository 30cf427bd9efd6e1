//! Fleet repository interface

use async_trait::async_trait;
use chrono::NaiveDate;

use super::model::Vehicle;
use crate::domain::DomainResult;

#[async_trait]
pub trait FleetRepository: Send + Sync {
    /// All non-deleted vehicles, the maintenance-sweep candidate set.
    async fn list_vehicles(&self) -> DomainResult<Vec<Vehicle>>;

    /// Advance the odometer-service watermark to `cycle`.
    async fn set_service_notified(&self, vehicle_id: i32, cycle: i64) -> DomainResult<()>;

    /// Record that the inspection reminder for `due` has been sent.
    async fn set_inspection_notified(&self, vehicle_id: i32, due: NaiveDate) -> DomainResult<()>;

    /// Record that the registration reminder for `due` has been sent.
    async fn set_registration_notified(&self, vehicle_id: i32, due: NaiveDate) -> DomainResult<()>;
}
