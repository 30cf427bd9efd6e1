//! Trip repository interface

use async_trait::async_trait;
use chrono::NaiveDate;

use super::model::{Trip, TripPoint, TripStatus};
use crate::domain::DomainResult;

#[async_trait]
pub trait TripRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Trip>>;

    /// Non-deleted trips, optionally filtered by route and/or date, ordered
    /// by date then sort.
    async fn list(
        &self,
        route_id: Option<i32>,
        date: Option<NaiveDate>,
    ) -> DomainResult<Vec<Trip>>;

    /// Persist a lifecycle transition together with the actual
    /// departure/arrival stamps.
    async fn update_status(
        &self,
        id: i32,
        status: TripStatus,
        actual_departure_at: Option<chrono::DateTime<chrono::Utc>>,
        actual_arrival_at: Option<chrono::DateTime<chrono::Utc>>,
    ) -> DomainResult<()>;

    /// Waypoints of one trip, ordered by `sort`.
    async fn points(&self, trip_id: i32) -> DomainResult<Vec<TripPoint>>;
}
