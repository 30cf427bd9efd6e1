//! Schedule registry repository interface

use async_trait::async_trait;

use super::model::{Schedule, ScheduleLeg, ScheduleStop, Stop};
use crate::domain::DomainResult;

#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    /// Find the single active schedule for a (route, weekday) pair.
    async fn find_active(&self, route_id: i32, weekday: i32) -> DomainResult<Option<Schedule>>;

    /// Legs of a schedule, ordered by `sort`.
    async fn legs(&self, schedule_id: i32) -> DomainResult<Vec<ScheduleLeg>>;

    /// Ordered stop list of one leg.
    async fn stops_for_leg(&self, leg_id: i32) -> DomainResult<Vec<ScheduleStop>>;

    /// Resolve stop master data by id.
    async fn find_stop(&self, stop_id: i32) -> DomainResult<Option<Stop>>;
}
