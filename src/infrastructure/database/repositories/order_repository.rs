//! SeaORM implementation of OrderRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::domain::order::{DisbursementStatus, Order, OrderItem, OrderRepository, OrderStatus};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{order, order_item};

pub struct SeaOrmOrderRepository {
    db: DatabaseConnection,
}

impl SeaOrmOrderRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn order_to_domain(m: order::Model) -> Order {
    Order {
        id: m.id,
        code: m.code,
        customer_id: m.customer_id,
        trip_id: m.trip_id,
        invoice_id: m.invoice_id,
        total: m.total,
        discount: m.discount,
        subtotal: m.subtotal,
        status: OrderStatus::from_str(&m.status),
        canceled_at: m.canceled_at,
        cancel_reason: m.cancel_reason,
        refund_bank_code: m.refund_bank_code,
        refund_account_name: m.refund_account_name,
        refund_account_number: m.refund_account_number,
        disbursement_status: DisbursementStatus::from_str(&m.disbursement_status),
        disbursement_response: m.disbursement_response,
        last_reminded_at: m.last_reminded_at,
        created_at: m.created_at,
    }
}

fn item_to_domain(m: order_item::Model) -> OrderItem {
    OrderItem {
        id: m.id,
        order_id: m.order_id,
        seat_id: m.seat_id,
        passenger_name: m.passenger_name,
        passenger_phone: m.passenger_phone,
        passenger_address: m.passenger_address,
        price: m.price,
        discount: m.discount,
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Validation(format!("Database error: {}", e))
}

// ── OrderRepository impl ────────────────────────────────────────

#[async_trait]
impl OrderRepository for SeaOrmOrderRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Order>> {
        let model = order::Entity::find_by_id(id)
            .filter(order::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(order_to_domain))
    }

    async fn items(&self, order_id: i32) -> DomainResult<Vec<OrderItem>> {
        let models = order_item::Entity::find()
            .filter(order_item::Column::OrderId.eq(order_id))
            .order_by_asc(order_item::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(item_to_domain).collect())
    }

    async fn list_paid(&self) -> DomainResult<Vec<Order>> {
        let models = order::Entity::find()
            .filter(order::Column::Status.eq(OrderStatus::Paid.as_str()))
            .filter(order::Column::DeletedAt.is_null())
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(order_to_domain).collect())
    }

    async fn mark_reminded(&self, order_id: i32, at: DateTime<Utc>) -> DomainResult<()> {
        debug!("Marking order {} reminded at {}", order_id, at);

        order::Entity::update_many()
            .col_expr(order::Column::LastRemindedAt, Expr::value(at))
            .filter(order::Column::Id.eq(order_id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn expire_pending(&self, order_id: i32) -> DomainResult<bool> {
        let result = order::Entity::update_many()
            .col_expr(
                order::Column::Status,
                Expr::value(OrderStatus::Expired.as_str()),
            )
            .filter(order::Column::Id.eq(order_id))
            .filter(order::Column::Status.eq(OrderStatus::Pending.as_str()))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn find_pending_for_seat(&self, seat_id: i32) -> DomainResult<Option<Order>> {
        let items = order_item::Entity::find()
            .filter(order_item::Column::SeatId.eq(seat_id))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        if items.is_empty() {
            return Ok(None);
        }

        let order_ids: Vec<i32> = items.into_iter().map(|i| i.order_id).collect();
        let model = order::Entity::find()
            .filter(order::Column::Id.is_in(order_ids))
            .filter(order::Column::Status.eq(OrderStatus::Pending.as_str()))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(order_to_domain))
    }
}
