//! Seat repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::Seat;
use crate::domain::DomainResult;

#[async_trait]
pub trait SeatRepository: Send + Sync {
    async fn list_for_trip(&self, trip_id: i32) -> DomainResult<Vec<Seat>>;

    /// ONHOLD seats whose hold expiry has passed.
    async fn find_expired_holds(&self, now: DateTime<Utc>) -> DomainResult<Vec<Seat>>;

    /// Release a held seat back to AVAILABLE. Compare-and-swap on
    /// (status = ONHOLD, version); returns false when another writer won.
    async fn release(&self, seat_id: i32, expected_version: i32) -> DomainResult<bool>;
}
