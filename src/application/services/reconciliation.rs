//! Payment callback reconciliation
//!
//! Applies gateway webhook deliveries exactly once per status transition.
//! Processing is linearized per external reference with a keyed lock; the
//! raw status is recorded last-write-wins, but side effects (order state,
//! seats, counters, subscriptions) fire only when the normalized status
//! actually changes.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use serde_json::json;
use tracing::{info, warn};

use crate::domain::invoice::PaymentOutcome;
use crate::domain::order::OrderStatus;
use crate::domain::ports::{InAppNotification, NotificationDispatcher};
use crate::domain::seat::SeatStatus;
use crate::domain::subscription::{extend_expiry, SubscriptionStatus};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{
    invoice, order, order_item, subscription_order, trip, trip_seat,
};
use crate::shared::keyed_lock::KeyedLock;

/// What a callback delivery did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The normalized status changed and side effects were applied.
    Applied(String),
    /// Same normalized status as before; raw status refreshed, nothing else.
    Replayed,
}

#[derive(Debug, Clone)]
pub struct CallbackPayload {
    pub external_ref: String,
    pub raw_status: String,
    pub paid_amount: Option<i64>,
    pub paid_at: Option<DateTime<Utc>>,
    pub payment_method: Option<String>,
    pub payment_channel: Option<String>,
}

pub struct ReconciliationService {
    db: DatabaseConnection,
    locks: KeyedLock,
    dispatcher: Arc<dyn NotificationDispatcher>,
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Validation(format!("Database error: {}", e))
}

impl ReconciliationService {
    pub fn new(db: DatabaseConnection, dispatcher: Arc<dyn NotificationDispatcher>) -> Self {
        Self {
            db,
            locks: KeyedLock::new(),
            dispatcher,
        }
    }

    pub async fn process_callback(
        &self,
        payload: CallbackPayload,
    ) -> DomainResult<ReconcileOutcome> {
        // Duplicate and reordered deliveries for the same invoice are
        // serialized here.
        let _guard = self.locks.acquire(&payload.external_ref).await;

        let invoice_row = invoice::Entity::find()
            .filter(invoice::Column::ExternalRef.eq(payload.external_ref.as_str()))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(DomainError::NotFound {
                entity: "Invoice",
                field: "external_ref",
                value: payload.external_ref.clone(),
            })?;

        let outcome = PaymentOutcome::normalize(&payload.raw_status);
        let previous = invoice_row.normalized_status.clone();
        let is_replay = previous == outcome.as_str();

        let txn = self.db.begin().await.map_err(db_err)?;

        let mut active: invoice::ActiveModel = invoice_row.clone().into();
        active.raw_status = Set(payload.raw_status.clone());
        active.normalized_status = Set(outcome.as_str().to_string());
        if outcome == PaymentOutcome::Paid {
            active.paid_amount = Set(payload.paid_amount);
            active.paid_at = Set(Some(payload.paid_at.unwrap_or_else(Utc::now)));
            active.payment_method = Set(payload.payment_method.clone());
            active.payment_channel = Set(payload.payment_channel.clone());
        }
        active.update(&txn).await.map_err(db_err)?;

        if is_replay {
            txn.commit().await.map_err(db_err)?;
            info!(
                external_ref = %payload.external_ref,
                status = %outcome.as_str(),
                "Callback replay, side effects skipped"
            );
            return Ok(ReconcileOutcome::Replayed);
        }

        match outcome {
            PaymentOutcome::Paid => {
                self.apply_paid(&txn, &invoice_row, &payload).await?;
            }
            PaymentOutcome::Expired => {
                self.apply_expired(&txn, &invoice_row).await?;
            }
            PaymentOutcome::PassThrough(_) => {}
        }

        txn.commit().await.map_err(db_err)?;

        info!(
            external_ref = %payload.external_ref,
            from = %previous,
            to = %outcome.as_str(),
            "💳 Payment status applied"
        );
        Ok(ReconcileOutcome::Applied(outcome.as_str().to_string()))
    }

    /// PAID side effects: confirm the order and its seats, bump the trip
    /// sales counter, or activate the subscription this invoice belongs to.
    async fn apply_paid(
        &self,
        txn: &sea_orm::DatabaseTransaction,
        invoice_row: &invoice::Model,
        payload: &CallbackPayload,
    ) -> DomainResult<()> {
        let order_row = order::Entity::find()
            .filter(order::Column::InvoiceId.eq(invoice_row.id))
            .filter(order::Column::DeletedAt.is_null())
            .one(txn)
            .await
            .map_err(db_err)?;

        let Some(order_row) = order_row else {
            return self.apply_paid_subscription(txn, invoice_row, payload).await;
        };

        // A payment landing after the hold-expiry sweep still wins: EXPIRED
        // orders are revived, only CANCELED ones stay untouched.
        let prior = OrderStatus::from_str(&order_row.status);
        if !matches!(prior, OrderStatus::Pending | OrderStatus::Expired) {
            warn!(
                order_id = order_row.id,
                status = %order_row.status,
                "Paid callback for a canceled order, leaving order untouched"
            );
            return Ok(());
        }

        order::Entity::update_many()
            .col_expr(
                order::Column::Status,
                Expr::value(OrderStatus::Paid.as_str()),
            )
            .filter(order::Column::Id.eq(order_row.id))
            .exec(txn)
            .await
            .map_err(db_err)?;

        let items = order_item::Entity::find()
            .filter(order_item::Column::OrderId.eq(order_row.id))
            .all(txn)
            .await
            .map_err(db_err)?;
        let seat_ids: Vec<i32> = items.iter().map(|i| i.seat_id).collect();

        // The payment wins over the hold-expiry sweep: seats move to PAID
        // whether they are still ONHOLD or were already released.
        let reclaimed = trip_seat::Entity::update_many()
            .col_expr(
                trip_seat::Column::Status,
                Expr::value(SeatStatus::Paid.as_str()),
            )
            .col_expr(trip_seat::Column::IsAvail, Expr::value(false))
            .col_expr(
                trip_seat::Column::HoldExpiresAt,
                Expr::value(sea_orm::Value::ChronoDateTimeUtc(None)),
            )
            .col_expr(
                trip_seat::Column::Version,
                Expr::col(trip_seat::Column::Version).add(1),
            )
            .filter(trip_seat::Column::Id.is_in(seat_ids.clone()))
            .filter(trip_seat::Column::Status.is_in(vec![
                SeatStatus::OnHold.as_str(),
                SeatStatus::Available.as_str(),
            ]))
            .exec(txn)
            .await
            .map_err(db_err)?;

        // A seat resold after the hold lapsed cannot be taken back; the
        // whole application rolls back and the gateway retries into a 409.
        if reclaimed.rows_affected != seat_ids.len() as u64 {
            return Err(DomainError::Conflict(format!(
                "order {}: only {} of {} seats could be confirmed, a seat was resold after the hold lapsed",
                order_row.code,
                reclaimed.rows_affected,
                seat_ids.len()
            )));
        }

        trip::Entity::update_many()
            .col_expr(
                trip::Column::TicketSold,
                Expr::col(trip::Column::TicketSold).add(items.len() as i32),
            )
            .filter(trip::Column::Id.eq(order_row.trip_id))
            .exec(txn)
            .await
            .map_err(db_err)?;

        // Best-effort: a failed notification never fails the callback.
        let note = InAppNotification {
            title: "Payment received".to_string(),
            body: format!("Order {} is confirmed", order_row.code),
            audience: order_row.customer_id.to_string(),
            channel: "PAYMENT".to_string(),
            template_key: "payment_received".to_string(),
            data: json!({ "order_code": order_row.code }),
        };
        if let Err(e) = self.dispatcher.dispatch_in_app(&note).await {
            warn!(order_id = order_row.id, error = %e, "Payment notification failed");
        }

        Ok(())
    }

    async fn apply_paid_subscription(
        &self,
        txn: &sea_orm::DatabaseTransaction,
        invoice_row: &invoice::Model,
        payload: &CallbackPayload,
    ) -> DomainResult<()> {
        let sub_row = subscription_order::Entity::find()
            .filter(subscription_order::Column::InvoiceId.eq(invoice_row.id))
            .one(txn)
            .await
            .map_err(db_err)?;

        let Some(sub_row) = sub_row else {
            warn!(
                invoice_id = invoice_row.id,
                "Paid invoice matches neither an order nor a subscription"
            );
            return Ok(());
        };

        if SubscriptionStatus::from_str(&sub_row.status) != SubscriptionStatus::Pending {
            return Ok(());
        }

        let paid_at = payload.paid_at.unwrap_or_else(Utc::now);
        let expiry = extend_expiry(paid_at, sub_row.duration_months.max(0) as u32);

        let mut active: subscription_order::ActiveModel = sub_row.into();
        active.status = Set(SubscriptionStatus::Active.as_str().to_string());
        active.expired_date = Set(Some(expiry));
        active.update(txn).await.map_err(db_err)?;

        Ok(())
    }

    /// EXPIRED side effects: expire the pending order and put its held
    /// seats back into inventory.
    async fn apply_expired(
        &self,
        txn: &sea_orm::DatabaseTransaction,
        invoice_row: &invoice::Model,
    ) -> DomainResult<()> {
        let order_row = order::Entity::find()
            .filter(order::Column::InvoiceId.eq(invoice_row.id))
            .filter(order::Column::DeletedAt.is_null())
            .one(txn)
            .await
            .map_err(db_err)?;

        let Some(order_row) = order_row else {
            return Ok(());
        };

        let result = order::Entity::update_many()
            .col_expr(
                order::Column::Status,
                Expr::value(OrderStatus::Expired.as_str()),
            )
            .filter(order::Column::Id.eq(order_row.id))
            .filter(order::Column::Status.eq(OrderStatus::Pending.as_str()))
            .exec(txn)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            // Already paid or canceled; expiry loses.
            return Ok(());
        }

        let items = order_item::Entity::find()
            .filter(order_item::Column::OrderId.eq(order_row.id))
            .all(txn)
            .await
            .map_err(db_err)?;
        let seat_ids: Vec<i32> = items.iter().map(|i| i.seat_id).collect();

        trip_seat::Entity::update_many()
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
            .filter(trip_seat::Column::Status.eq(SeatStatus::OnHold.as_str()))
            .exec(txn)
            .await
            .map_err(db_err)?;

        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::{
        seed_customer, seed_invoice, seed_order, seed_order_item, seed_trip, test_db,
        NullDispatcher,
    };
    use chrono::NaiveDate;

    fn payload(external_ref: &str, raw_status: &str) -> CallbackPayload {
        CallbackPayload {
            external_ref: external_ref.to_string(),
            raw_status: raw_status.to_string(),
            paid_amount: Some(185_000),
            paid_at: Some(Utc::now()),
            payment_method: Some("VA".to_string()),
            payment_channel: Some("BCA".to_string()),
        }
    }

    async fn set_seats(db: &DatabaseConnection, seat_ids: &[i32], status: &str) {
        trip_seat::Entity::update_many()
            .col_expr(trip_seat::Column::Status, Expr::value(status))
            .filter(trip_seat::Column::Id.is_in(seat_ids.to_vec()))
            .exec(db)
            .await
            .unwrap();
    }

    /// Seeds a pending order with held seats behind one invoice; returns
    /// (trip_id, seat_ids, order_id).
    async fn seed_pending_order(
        db: &DatabaseConnection,
        external_ref: &str,
    ) -> (i32, Vec<i32>, i32) {
        let date = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        let (trip_id, seat_ids) = seed_trip(db, 1, 100_000, 2, date).await;
        set_seats(db, &seat_ids, "ONHOLD").await;
        let customer_id = seed_customer(db).await;
        let invoice_id = seed_invoice(db, external_ref).await;
        let order_id = seed_order(
            db,
            customer_id,
            trip_id,
            Some(invoice_id),
            "PENDING",
            200_000,
            0,
            200_000,
        )
        .await;
        for &seat_id in &seat_ids {
            seed_order_item(db, order_id, seat_id, 100_000).await;
        }
        (trip_id, seat_ids, order_id)
    }

    fn service(db: &DatabaseConnection) -> ReconciliationService {
        ReconciliationService::new(db.clone(), Arc::new(NullDispatcher))
    }

    #[tokio::test]
    async fn replayed_callback_refreshes_status_without_side_effects() {
        let db = test_db().await;
        let (trip_id, seat_ids, order_id) = seed_pending_order(&db, "ref-replay").await;
        let svc = service(&db);

        let first = svc.process_callback(payload("ref-replay", "SETTLED")).await.unwrap();
        assert_eq!(first, ReconcileOutcome::Applied("PAID".to_string()));

        let trip_row = trip::Entity::find_by_id(trip_id).one(&db).await.unwrap().unwrap();
        assert_eq!(trip_row.ticket_sold, 2);

        // Same normalized status again: raw status recorded, counters frozen.
        let second = svc.process_callback(payload("ref-replay", "PAID")).await.unwrap();
        assert_eq!(second, ReconcileOutcome::Replayed);

        let trip_row = trip::Entity::find_by_id(trip_id).one(&db).await.unwrap().unwrap();
        assert_eq!(trip_row.ticket_sold, 2);

        let order_row = order::Entity::find_by_id(order_id).one(&db).await.unwrap().unwrap();
        assert_eq!(order_row.status, "PAID");

        let seats = trip_seat::Entity::find()
            .filter(trip_seat::Column::Id.is_in(seat_ids))
            .all(&db)
            .await
            .unwrap();
        assert!(seats.iter().all(|s| s.status == "PAID" && s.version == 1));
    }

    #[tokio::test]
    async fn expired_callback_releases_held_seats() {
        let db = test_db().await;
        let (_, seat_ids, order_id) = seed_pending_order(&db, "ref-expired").await;
        let svc = service(&db);

        let outcome = svc.process_callback(payload("ref-expired", "VOIDED")).await.unwrap();
        assert_eq!(outcome, ReconcileOutcome::Applied("EXPIRED".to_string()));

        let order_row = order::Entity::find_by_id(order_id).one(&db).await.unwrap().unwrap();
        assert_eq!(order_row.status, "EXPIRED");

        let seats = trip_seat::Entity::find()
            .filter(trip_seat::Column::Id.is_in(seat_ids))
            .all(&db)
            .await
            .unwrap();
        assert!(seats.iter().all(|s| s.status == "AVAILABLE"));
    }

    #[tokio::test]
    async fn late_payment_reclaims_an_expired_order() {
        let db = test_db().await;
        let (trip_id, seat_ids, order_id) = seed_pending_order(&db, "ref-late").await;
        let svc = service(&db);

        // The hold lapsed first: order expired, seats back in inventory.
        svc.process_callback(payload("ref-late", "EXPIRED")).await.unwrap();

        let outcome = svc.process_callback(payload("ref-late", "PAID")).await.unwrap();
        assert_eq!(outcome, ReconcileOutcome::Applied("PAID".to_string()));

        let order_row = order::Entity::find_by_id(order_id).one(&db).await.unwrap().unwrap();
        assert_eq!(order_row.status, "PAID");

        let seats = trip_seat::Entity::find()
            .filter(trip_seat::Column::Id.is_in(seat_ids))
            .all(&db)
            .await
            .unwrap();
        assert!(seats.iter().all(|s| s.status == "PAID"));

        let trip_row = trip::Entity::find_by_id(trip_id).one(&db).await.unwrap().unwrap();
        assert_eq!(trip_row.ticket_sold, 2);
    }

    #[tokio::test]
    async fn late_payment_conflicts_when_a_seat_was_resold() {
        let db = test_db().await;
        let (_, seat_ids, order_id) = seed_pending_order(&db, "ref-resold").await;
        let svc = service(&db);

        svc.process_callback(payload("ref-resold", "EXPIRED")).await.unwrap();

        // Another booking paid for one of the released seats in between.
        set_seats(&db, &seat_ids[..1], "PAID").await;

        let err = svc
            .process_callback(payload("ref-resold", "SETTLED"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        // The whole application rolled back, invoice status included.
        let invoice_row = invoice::Entity::find()
            .filter(invoice::Column::ExternalRef.eq("ref-resold"))
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(invoice_row.normalized_status, "EXPIRED");

        let order_row = order::Entity::find_by_id(order_id).one(&db).await.unwrap().unwrap();
        assert_eq!(order_row.status, "EXPIRED");
    }

    #[tokio::test]
    async fn unknown_reference_is_not_found() {
        let db = test_db().await;
        let svc = service(&db);
        let err = svc
            .process_callback(payload("ref-missing", "PAID"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }
}
