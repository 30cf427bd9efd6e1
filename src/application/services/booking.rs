//! Order booking workflow
//!
//! Creates a PENDING order with seat holds and a gateway invoice. The
//! gateway invoice is created first; the database transaction then inserts
//! the invoice mirror, the order with its items, and flips each requested
//! seat AVAILABLE -> ONHOLD with a compare-and-swap. Losing any seat race
//! rolls the whole booking back with a conflict.

use std::sync::Arc;

use chrono::{Duration, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use tracing::{info, warn};

use crate::config::{BookingConfig, PaymentConfig};
use crate::domain::invoice::PaymentOutcome;
use crate::domain::order::OrderStatus;
use crate::domain::ports::{InvoiceRequest, PaymentGateway};
use crate::domain::seat::SeatStatus;
use crate::domain::trip::TripStatus;
use crate::domain::voucher::{Discount, VoucherKind};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{
    customer, invoice, order, order_item, trip, trip_seat, voucher,
};
use crate::shared::codes;

/// One passenger occupying one seat.
#[derive(Debug, Clone)]
pub struct PassengerSelection {
    pub seat_id: i32,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// Per-seat price in minor units; None falls back to the trip's base price
    pub price: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub trip_id: i32,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub customer_address: Option<String>,
    pub passengers: Vec<PassengerSelection>,
    pub voucher_code: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BookingConfirmation {
    pub order_id: i32,
    pub order_code: String,
    pub external_ref: String,
    pub payment_url: String,
    /// Sum of seat prices
    pub total: i64,
    pub discount: i64,
    /// Total after discount; the amount disbursed on a refund
    pub subtotal: i64,
    /// Subtotal plus admin fee; the invoiced amount
    pub amount_due: i64,
    pub hold_expires_at: chrono::DateTime<Utc>,
}

pub struct BookingService {
    db: DatabaseConnection,
    gateway: Arc<dyn PaymentGateway>,
    payment: PaymentConfig,
    booking: BookingConfig,
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Validation(format!("Database error: {}", e))
}

impl BookingService {
    pub fn new(
        db: DatabaseConnection,
        gateway: Arc<dyn PaymentGateway>,
        payment: PaymentConfig,
        booking: BookingConfig,
    ) -> Self {
        Self {
            db,
            gateway,
            payment,
            booking,
        }
    }

    pub async fn create_order(&self, req: BookingRequest) -> DomainResult<BookingConfirmation> {
        if req.passengers.is_empty() {
            return Err(DomainError::Validation(
                "at least one passenger is required".to_string(),
            ));
        }

        let trip_row = trip::Entity::find_by_id(req.trip_id)
            .filter(trip::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(DomainError::NotFound {
                entity: "Trip",
                field: "id",
                value: req.trip_id.to_string(),
            })?;

        if TripStatus::from_str(&trip_row.status) != TripStatus::Pending {
            return Err(DomainError::Conflict(format!(
                "trip {} is no longer open for booking",
                trip_row.code
            )));
        }

        // Pre-check seat availability outside the transaction; the CAS
        // inside the transaction is the authoritative gate.
        let seat_ids: Vec<i32> = req.passengers.iter().map(|p| p.seat_id).collect();
        let seats = trip_seat::Entity::find()
            .filter(trip_seat::Column::Id.is_in(seat_ids.clone()))
            .filter(trip_seat::Column::TripId.eq(trip_row.id))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        if seats.len() != req.passengers.len() {
            return Err(DomainError::Validation(
                "one or more seats do not belong to this trip".to_string(),
            ));
        }
        if let Some(taken) = seats
            .iter()
            .find(|s| SeatStatus::from_str(&s.status) != SeatStatus::Available)
        {
            return Err(DomainError::Conflict(format!(
                "seat {} is not available",
                taken.code
            )));
        }

        let prices: Vec<i64> = req
            .passengers
            .iter()
            .map(|p| p.price.unwrap_or(trip_row.base_price))
            .collect();
        let discount = self.resolve_discount(&req, &prices).await?;
        let total: i64 = prices.iter().sum();
        let subtotal = total - discount.total;
        let amount_due = subtotal + self.payment.admin_fee;

        let customer_row = self.resolve_customer(&req).await?;

        // Gateway first: without a payment URL there is nothing to hold
        // seats for.
        let external_ref = codes::external_ref();
        let order_code = codes::order_code();
        let handle = self
            .gateway
            .create_invoice(&InvoiceRequest {
                external_ref: external_ref.clone(),
                amount: amount_due,
                currency: self.payment.currency.clone(),
                description: format!(
                    "{} {} to {} on {}",
                    order_code, trip_row.departure_city, trip_row.arrival_city, trip_row.date
                ),
                customer_name: customer_row.name.clone(),
                customer_phone: customer_row.phone.clone(),
                success_redirect_url: self.payment.success_redirect_url.clone(),
                failure_redirect_url: self.payment.failure_redirect_url.clone(),
            })
            .await?;

        let now = Utc::now();
        let hold_expires_at = now + Duration::minutes(self.booking.hold_ttl_minutes);

        let txn = self.db.begin().await.map_err(db_err)?;

        let invoice_row = invoice::ActiveModel {
            external_ref: Set(external_ref.clone()),
            gateway_invoice_id: Set(handle.gateway_invoice_id),
            payment_url: Set(handle.payment_url.clone()),
            raw_status: Set("PENDING".to_string()),
            normalized_status: Set(PaymentOutcome::normalize("PENDING").as_str().to_string()),
            paid_amount: Set(None),
            paid_at: Set(None),
            payment_method: Set(None),
            payment_channel: Set(None),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(db_err)?;

        let order_row = order::ActiveModel {
            code: Set(order_code),
            customer_id: Set(customer_row.id),
            trip_id: Set(trip_row.id),
            invoice_id: Set(Some(invoice_row.id)),
            total: Set(total),
            discount: Set(discount.total),
            subtotal: Set(subtotal),
            status: Set(OrderStatus::Pending.as_str().to_string()),
            canceled_at: Set(None),
            cancel_reason: Set(None),
            refund_bank_code: Set(None),
            refund_account_name: Set(None),
            refund_account_number: Set(None),
            disbursement_status: Set("NONE".to_string()),
            disbursement_response: Set(None),
            last_reminded_at: Set(None),
            created_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(db_err)?;

        for (i, passenger) in req.passengers.iter().enumerate() {
            order_item::ActiveModel {
                order_id: Set(order_row.id),
                seat_id: Set(passenger.seat_id),
                passenger_name: Set(passenger.name.clone()),
                passenger_phone: Set(passenger.phone.clone()),
                passenger_address: Set(passenger.address.clone()),
                price: Set(prices[i]),
                discount: Set(discount.per_item.get(i).copied().unwrap_or(0)),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(db_err)?;
        }

        // Hold every seat with a CAS; any lost race aborts the booking.
        for seat in &seats {
            let result = trip_seat::Entity::update_many()
                .col_expr(
                    trip_seat::Column::Status,
                    Expr::value(SeatStatus::OnHold.as_str()),
                )
                .col_expr(trip_seat::Column::IsAvail, Expr::value(false))
                .col_expr(trip_seat::Column::HoldExpiresAt, Expr::value(hold_expires_at))
                .col_expr(trip_seat::Column::Version, Expr::value(seat.version + 1))
                .filter(trip_seat::Column::Id.eq(seat.id))
                .filter(
                    trip_seat::Column::Status.eq(SeatStatus::Available.as_str()),
                )
                .filter(trip_seat::Column::Version.eq(seat.version))
                .exec(&txn)
                .await
                .map_err(db_err)?;

            if result.rows_affected == 0 {
                warn!(seat_id = seat.id, "Seat hold race lost, rolling back booking");
                txn.rollback().await.map_err(db_err)?;
                return Err(DomainError::Conflict(format!(
                    "seat {} was taken by another booking",
                    seat.code
                )));
            }
        }

        txn.commit().await.map_err(db_err)?;

        info!(
            order_id = order_row.id,
            code = %order_row.code,
            seats = req.passengers.len(),
            amount_due,
            "🎫 Order created"
        );

        Ok(BookingConfirmation {
            order_id: order_row.id,
            order_code: order_row.code,
            external_ref,
            payment_url: handle.payment_url,
            total,
            discount: discount.total,
            subtotal,
            amount_due,
            hold_expires_at,
        })
    }

    async fn resolve_discount(
        &self,
        req: &BookingRequest,
        prices: &[i64],
    ) -> DomainResult<Discount> {
        let Some(code) = &req.voucher_code else {
            return Ok(Discount::zero(req.passengers.len()));
        };

        let row = voucher::Entity::find()
            .filter(voucher::Column::Code.eq(code.as_str()))
            .filter(voucher::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(DomainError::NotFound {
                entity: "Voucher",
                field: "code",
                value: code.clone(),
            })?;

        let v = crate::domain::voucher::Voucher {
            id: row.id,
            code: row.code,
            kind: VoucherKind::from_str(&row.kind),
            value: row.value,
            is_active: row.is_active,
            expires_at: row.expires_at,
        };
        if !v.is_redeemable(Utc::now()) {
            return Err(DomainError::Validation(format!(
                "voucher {} is not redeemable",
                v.code
            )));
        }

        Ok(v.discount_for(prices))
    }

    async fn resolve_customer(&self, req: &BookingRequest) -> DomainResult<customer::Model> {
        let existing = customer::Entity::find()
            .filter(customer::Column::Phone.eq(req.customer_phone.as_str()))
            .filter(customer::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(db_err)?;

        if let Some(found) = existing {
            return Ok(found);
        }

        customer::ActiveModel {
            name: Set(req.customer_name.clone()),
            phone: Set(req.customer_phone.clone()),
            email: Set(req.customer_email.clone()),
            address: Set(req.customer_address.clone()),
            created_at: Set(Utc::now()),
            deleted_at: Set(None),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_err)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::{seed_trip, test_db, StubGateway};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use sea_orm::QueryOrder;

    fn trip_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()
    }

    fn request(trip_id: i32, seat_ids: &[i32], voucher: Option<&str>) -> BookingRequest {
        BookingRequest {
            trip_id,
            customer_name: "Budi Santoso".to_string(),
            customer_phone: "081234567890".to_string(),
            customer_email: None,
            customer_address: None,
            passengers: seat_ids
                .iter()
                .map(|&seat_id| PassengerSelection {
                    seat_id,
                    name: "Budi Santoso".to_string(),
                    phone: None,
                    address: None,
                    price: None,
                })
                .collect(),
            voucher_code: voucher.map(|c| c.to_string()),
        }
    }

    fn service(db: &DatabaseConnection, gateway: Arc<dyn PaymentGateway>) -> BookingService {
        BookingService::new(
            db.clone(),
            gateway,
            PaymentConfig {
                admin_fee: 5_000,
                ..Default::default()
            },
            BookingConfig::default(),
        )
    }

    async fn seed_flat_voucher(db: &DatabaseConnection, code: &str, value: i64) {
        voucher::ActiveModel {
            code: Set(code.to_string()),
            kind: Set("FLAT".to_string()),
            value: Set(value),
            is_active: Set(true),
            expires_at: Set(None),
            created_at: Set(Utc::now()),
            deleted_at: Set(None),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn order_money_fields_follow_the_discount_then_fee_chain() {
        let db = test_db().await;
        let (trip_id, seat_ids) = seed_trip(&db, 1, 100_000, 4, trip_date()).await;
        seed_flat_voucher(&db, "HEMAT20", 20_000).await;

        let gateway = StubGateway::new();
        let svc = service(&db, gateway.clone());
        let confirmation = svc
            .create_order(request(trip_id, &seat_ids[..2], Some("HEMAT20")))
            .await
            .unwrap();

        assert_eq!(confirmation.total, 200_000);
        assert_eq!(confirmation.discount, 20_000);
        assert_eq!(confirmation.subtotal, 180_000);
        assert_eq!(confirmation.amount_due, 185_000);

        // The gateway is invoiced for subtotal plus the admin fee.
        let invoices = gateway.invoices.lock().unwrap();
        assert_eq!(invoices.len(), 1);
        assert_eq!(invoices[0].amount, 185_000);
        drop(invoices);

        let order_row = order::Entity::find_by_id(confirmation.order_id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(order_row.total, 200_000);
        assert_eq!(order_row.discount, 20_000);
        assert_eq!(order_row.subtotal, 180_000);

        let items = order_item::Entity::find()
            .filter(order_item::Column::OrderId.eq(confirmation.order_id))
            .order_by_asc(order_item::Column::Id)
            .all(&db)
            .await
            .unwrap();
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.price == 100_000));

        let held = trip_seat::Entity::find()
            .filter(trip_seat::Column::Id.is_in(seat_ids[..2].to_vec()))
            .all(&db)
            .await
            .unwrap();
        assert!(held.iter().all(|s| s.status == "ONHOLD" && s.version == 1));
    }

    #[tokio::test]
    async fn per_seat_prices_override_the_base_price() {
        let db = test_db().await;
        let (trip_id, seat_ids) = seed_trip(&db, 1, 100_000, 2, trip_date()).await;

        let mut req = request(trip_id, &seat_ids, None);
        req.passengers[1].price = Some(150_000);

        let gateway = StubGateway::new();
        let svc = service(&db, gateway);
        let confirmation = svc.create_order(req).await.unwrap();

        assert_eq!(confirmation.total, 250_000);
        assert_eq!(confirmation.amount_due, 255_000);

        let items = order_item::Entity::find()
            .filter(order_item::Column::OrderId.eq(confirmation.order_id))
            .order_by_asc(order_item::Column::Id)
            .all(&db)
            .await
            .unwrap();
        assert_eq!(items[0].price, 100_000);
        assert_eq!(items[1].price, 150_000);
    }

    #[tokio::test]
    async fn second_booking_for_a_held_seat_conflicts() {
        let db = test_db().await;
        let (trip_id, seat_ids) = seed_trip(&db, 1, 100_000, 2, trip_date()).await;

        let gateway = StubGateway::new();
        let svc = service(&db, gateway);
        svc.create_order(request(trip_id, &seat_ids[..1], None))
            .await
            .unwrap();

        let err = svc
            .create_order(request(trip_id, &seat_ids[..1], None))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    /// Gateway that steals a seat while the invoice is being created,
    /// between the availability pre-check and the hold transaction.
    struct RacingGateway {
        db: DatabaseConnection,
        seat_id: i32,
    }

    #[async_trait]
    impl PaymentGateway for RacingGateway {
        async fn create_invoice(
            &self,
            request: &InvoiceRequest,
        ) -> DomainResult<crate::domain::ports::InvoiceHandle> {
            trip_seat::Entity::update_many()
                .col_expr(
                    trip_seat::Column::Status,
                    Expr::value(SeatStatus::OnHold.as_str()),
                )
                .col_expr(trip_seat::Column::Version, Expr::value(1))
                .filter(trip_seat::Column::Id.eq(self.seat_id))
                .exec(&self.db)
                .await
                .map_err(db_err)?;
            Ok(crate::domain::ports::InvoiceHandle {
                gateway_invoice_id: format!("inv_{}", request.external_ref),
                payment_url: "https://pay.test/checkout".to_string(),
            })
        }

        async fn create_disbursement(
            &self,
            _request: &crate::domain::ports::DisbursementRequest,
        ) -> DomainResult<crate::domain::ports::DisbursementOutcome> {
            unreachable!("booking never disburses")
        }
    }

    #[tokio::test]
    async fn losing_the_seat_race_rolls_the_whole_order_back() {
        let db = test_db().await;
        let (trip_id, seat_ids) = seed_trip(&db, 1, 100_000, 2, trip_date()).await;

        let gateway = Arc::new(RacingGateway {
            db: db.clone(),
            seat_id: seat_ids[0],
        });
        let svc = service(&db, gateway);

        let err = svc
            .create_order(request(trip_id, &seat_ids, None))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        // Nothing from the failed booking persists.
        assert!(order::Entity::find().one(&db).await.unwrap().is_none());
        assert!(order_item::Entity::find().one(&db).await.unwrap().is_none());

        // The untouched seat keeps its original state.
        let second = trip_seat::Entity::find_by_id(seat_ids[1])
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(second.status, "AVAILABLE");
        assert_eq!(second.version, 0);
    }
}
