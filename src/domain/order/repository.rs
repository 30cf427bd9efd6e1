//! Order repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{Order, OrderItem};
use crate::domain::DomainResult;

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Order>>;

    async fn items(&self, order_id: i32) -> DomainResult<Vec<OrderItem>>;

    /// Non-deleted PAID orders, the departure-reminder candidate set.
    async fn list_paid(&self) -> DomainResult<Vec<Order>>;

    /// Set the departure-reminder watermark.
    async fn mark_reminded(&self, order_id: i32, at: DateTime<Utc>) -> DomainResult<()>;

    /// PENDING → EXPIRED; returns false when the order had already left
    /// PENDING.
    async fn expire_pending(&self, order_id: i32) -> DomainResult<bool>;

    /// The still-PENDING order holding a given seat, if any.
    async fn find_pending_for_seat(&self, seat_id: i32) -> DomainResult<Option<Order>>;
}
