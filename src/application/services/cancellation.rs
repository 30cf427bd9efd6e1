//! Order cancellation and refund disbursement
//!
//! Cancels a pending or paid order, releases its seats back to inventory
//! and, for paid orders with refund bank details, requests one disbursement
//! at the gateway. The disbursement outcome is recorded on the order and
//! never retried automatically; a failed transfer is resolved by staff.

use std::sync::Arc;

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use tracing::{info, warn};

use crate::domain::order::{DisbursementStatus, OrderStatus};
use crate::domain::ports::{DisbursementRequest, PaymentGateway};
use crate::domain::seat::SeatStatus;
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{order, order_item, trip, trip_seat};
use crate::shared::codes;

#[derive(Debug, Clone)]
pub struct RefundDetails {
    pub bank_code: String,
    pub account_name: String,
    pub account_number: String,
}

#[derive(Debug, Clone)]
pub struct CancellationRequest {
    pub order_id: i32,
    pub reason: String,
    pub refund: Option<RefundDetails>,
}

#[derive(Debug, Clone)]
pub struct CancellationReceipt {
    pub order_id: i32,
    pub order_code: String,
    pub seats_released: usize,
    pub disbursement_status: DisbursementStatus,
}

pub struct CancellationService {
    db: DatabaseConnection,
    gateway: Arc<dyn PaymentGateway>,
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Validation(format!("Database error: {}", e))
}

impl CancellationService {
    pub fn new(db: DatabaseConnection, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self { db, gateway }
    }

    pub async fn cancel_order(
        &self,
        req: CancellationRequest,
    ) -> DomainResult<CancellationReceipt> {
        let order_row = order::Entity::find_by_id(req.order_id)
            .filter(order::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(DomainError::NotFound {
                entity: "Order",
                field: "id",
                value: req.order_id.to_string(),
            })?;

        let status = OrderStatus::from_str(&order_row.status);
        match status {
            OrderStatus::Canceled => {
                return Err(DomainError::Conflict(format!(
                    "order {} is already canceled",
                    order_row.code
                )));
            }
            OrderStatus::Expired => {
                return Err(DomainError::Conflict(format!(
                    "order {} has expired and cannot be canceled",
                    order_row.code
                )));
            }
            OrderStatus::Pending | OrderStatus::Paid => {}
        }
        let was_paid = status == OrderStatus::Paid;

        let items = order_item::Entity::find()
            .filter(order_item::Column::OrderId.eq(order_row.id))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        let seat_ids: Vec<i32> = items.iter().map(|i| i.seat_id).collect();

        let now = Utc::now();
        let txn = self.db.begin().await.map_err(db_err)?;

        let mut active: order::ActiveModel = order_row.clone().into();
        active.status = Set(OrderStatus::Canceled.as_str().to_string());
        active.canceled_at = Set(Some(now));
        active.cancel_reason = Set(Some(req.reason.clone()));
        if let Some(refund) = &req.refund {
            active.refund_bank_code = Set(Some(refund.bank_code.clone()));
            active.refund_account_name = Set(Some(refund.account_name.clone()));
            active.refund_account_number = Set(Some(refund.account_number.clone()));
        }
        active.update(&txn).await.map_err(db_err)?;

        let released = trip_seat::Entity::update_many()
            .col_expr(
                trip_seat::Column::Status,
                Expr::value(SeatStatus::Available.as_str()),
            )
            .col_expr(trip_seat::Column::IsAvail, Expr::value(true))
            .col_expr(
                trip_seat::Column::HoldExpiresAt,
                Expr::value(sea_orm::Value::ChronoDateTimeUtc(None)),
            )
            .col_expr(
                trip_seat::Column::Version,
                Expr::col(trip_seat::Column::Version).add(1),
            )
            .filter(trip_seat::Column::Id.is_in(seat_ids))
            .filter(trip_seat::Column::Status.is_in(vec![
                SeatStatus::OnHold.as_str(),
                SeatStatus::Paid.as_str(),
            ]))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        if was_paid {
            trip::Entity::update_many()
                .col_expr(
                    trip::Column::TicketSold,
                    Expr::col(trip::Column::TicketSold).sub(items.len() as i32),
                )
                .filter(trip::Column::Id.eq(order_row.trip_id))
                .exec(&txn)
                .await
                .map_err(db_err)?;
        }

        txn.commit().await.map_err(db_err)?;

        info!(
            order_id = order_row.id,
            code = %order_row.code,
            was_paid,
            "🚫 Order canceled"
        );

        let disbursement_status = if was_paid {
            match &req.refund {
                Some(refund) => self.disburse_refund(&order_row, refund).await,
                None => DisbursementStatus::None,
            }
        } else {
            DisbursementStatus::None
        };

        Ok(CancellationReceipt {
            order_id: order_row.id,
            order_code: order_row.code,
            seats_released: released.rows_affected as usize,
            disbursement_status,
        })
    }

    /// Fire the refund transfer and persist its terminal outcome. Exactly
    /// one attempt; both the decline and the transport-failure paths leave
    /// the order in FAILED for manual follow-up.
    async fn disburse_refund(
        &self,
        order_row: &order::Model,
        refund: &RefundDetails,
    ) -> DisbursementStatus {
        // Refund the discounted seat total; the admin fee is not returned.
        let request = DisbursementRequest {
            external_ref: codes::external_ref(),
            amount: order_row.subtotal,
            bank_code: refund.bank_code.clone(),
            account_name: refund.account_name.clone(),
            account_number: refund.account_number.clone(),
            description: format!("Refund for order {}", order_row.code),
        };

        let (status, raw) = match self.gateway.create_disbursement(&request).await {
            Ok(outcome) if outcome.success => (DisbursementStatus::Settled, outcome.raw_response),
            Ok(outcome) => (DisbursementStatus::Failed, outcome.raw_response),
            Err(e) => {
                warn!(order_id = order_row.id, error = %e, "Disbursement transport failure");
                (DisbursementStatus::Failed, e.to_string())
            }
        };

        let update = order::Entity::update_many()
            .col_expr(
                order::Column::DisbursementStatus,
                Expr::value(status.as_str()),
            )
            .col_expr(
                order::Column::DisbursementResponse,
                Expr::value(Some(raw)),
            )
            .filter(order::Column::Id.eq(order_row.id))
            .exec(&self.db)
            .await;

        if let Err(e) = update {
            warn!(order_id = order_row.id, error = %e, "Failed to record disbursement outcome");
        }

        status
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::{
        seed_customer, seed_order, seed_order_item, seed_trip, test_db, StubGateway,
    };
    use chrono::NaiveDate;

    async fn mark_seats_paid(db: &DatabaseConnection, seat_ids: &[i32]) {
        trip_seat::Entity::update_many()
            .col_expr(
                trip_seat::Column::Status,
                Expr::value(SeatStatus::Paid.as_str()),
            )
            .col_expr(trip_seat::Column::IsAvail, Expr::value(false))
            .col_expr(trip_seat::Column::Version, Expr::value(2))
            .filter(trip_seat::Column::Id.is_in(seat_ids.to_vec()))
            .exec(db)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn paid_order_refund_disburses_the_discounted_total_without_the_fee() {
        let db = test_db().await;
        let date = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        let (trip_id, seat_ids) = seed_trip(&db, 1, 100_000, 2, date).await;
        mark_seats_paid(&db, &seat_ids).await;
        trip::Entity::update_many()
            .col_expr(trip::Column::TicketSold, Expr::value(2))
            .filter(trip::Column::Id.eq(trip_id))
            .exec(&db)
            .await
            .unwrap();

        let customer_id = seed_customer(&db).await;
        // total 200_000, discount 20_000, subtotal 180_000; invoiced 185_000.
        let order_id =
            seed_order(&db, customer_id, trip_id, None, "PAID", 200_000, 20_000, 180_000).await;
        for &seat_id in &seat_ids {
            seed_order_item(&db, order_id, seat_id, 100_000).await;
        }

        let gateway = StubGateway::new();
        let svc = CancellationService::new(db.clone(), gateway.clone());
        let receipt = svc
            .cancel_order(CancellationRequest {
                order_id,
                reason: "schedule change".to_string(),
                refund: Some(RefundDetails {
                    bank_code: "BCA".to_string(),
                    account_name: "Budi Santoso".to_string(),
                    account_number: "1234567890".to_string(),
                }),
            })
            .await
            .unwrap();

        assert_eq!(receipt.seats_released, 2);
        assert_eq!(receipt.disbursement_status, DisbursementStatus::Settled);

        let disbursements = gateway.disbursements.lock().unwrap();
        assert_eq!(disbursements.len(), 1);
        assert_eq!(disbursements[0].amount, 180_000);
        drop(disbursements);

        let seats = trip_seat::Entity::find()
            .filter(trip_seat::Column::Id.is_in(seat_ids))
            .all(&db)
            .await
            .unwrap();
        assert!(seats.iter().all(|s| s.status == "AVAILABLE"));

        let trip_row = trip::Entity::find_by_id(trip_id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(trip_row.ticket_sold, 0);
    }

    #[tokio::test]
    async fn canceling_twice_conflicts() {
        let db = test_db().await;
        let date = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        let (trip_id, _) = seed_trip(&db, 1, 100_000, 1, date).await;
        let customer_id = seed_customer(&db).await;
        let order_id =
            seed_order(&db, customer_id, trip_id, None, "CANCELED", 100_000, 0, 100_000).await;

        let svc = CancellationService::new(db, StubGateway::new());
        let err = svc
            .cancel_order(CancellationRequest {
                order_id,
                reason: "again".to_string(),
                refund: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }
}
