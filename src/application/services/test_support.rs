//! Shared fixtures for service tests: an in-memory database with the full
//! migration set, seeders for the rows the workflows touch, and stub
//! implementations of the outbound collaborators.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use sea_orm_migration::MigratorTrait;

use crate::domain::ports::{
    DisbursementOutcome, DisbursementRequest, EmailNotification, InAppNotification, InvoiceHandle,
    InvoiceRequest, NotificationDispatcher, PaymentGateway,
};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::{
    customer, driver, invoice, order, order_item, schedule, schedule_leg, schedule_stop, stop,
    trip, trip_seat, vehicle, vehicle_seat,
};
use crate::infrastructure::database::Migrator;
use crate::shared::codes;

/// Fresh in-memory database with all migrations applied. One connection so
/// every handle sees the same database.
pub(crate) async fn test_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1);
    let db = Database::connect(opts).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

pub(crate) async fn seed_stops(db: &DatabaseConnection) -> (i32, i32) {
    let a = stop::ActiveModel {
        name: Set("Terminal Kampung Rambutan".to_string()),
        city: Set("Jakarta".to_string()),
        created_at: Set(Utc::now()),
        deleted_at: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();
    let b = stop::ActiveModel {
        name: Set("Terminal Leuwipanjang".to_string()),
        city: Set("Bandung".to_string()),
        created_at: Set(Utc::now()),
        deleted_at: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();
    (a.id, b.id)
}

pub(crate) async fn seed_vehicle(db: &DatabaseConnection, seats: i32) -> i32 {
    let veh = vehicle::ActiveModel {
        name: Set("Armada 01".to_string()),
        plate_number: Set("B 7001 XA".to_string()),
        capacity: Set(seats),
        odometer_km: Set(0),
        service_interval_km: Set(None),
        service_cycle_notified: Set(0),
        inspection_due: Set(None),
        registration_due: Set(None),
        inspection_notified_for: Set(None),
        registration_notified_for: Set(None),
        created_at: Set(Utc::now()),
        deleted_at: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();

    for n in 0..seats {
        vehicle_seat::ActiveModel {
            vehicle_id: Set(veh.id),
            code: Set(format!("{}A", n + 1)),
            row: Set(n + 1),
            column: Set(1),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap();
    }
    veh.id
}

pub(crate) async fn seed_driver(db: &DatabaseConnection) -> i32 {
    driver::ActiveModel {
        code: Set("DRV-001".to_string()),
        name: Set("Pak Dedi".to_string()),
        phone: Set(None),
        created_at: Set(Utc::now()),
        deleted_at: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
    .id
}

/// Schedule for one (route, weekday) with one leg per `is_round` flag, all
/// running stop_a 08:00 -> stop_b 12:00 at 100_000.
pub(crate) async fn seed_schedule(
    db: &DatabaseConnection,
    route_id: i32,
    weekday: i32,
    vehicle_id: i32,
    driver_id: i32,
    stop_a: i32,
    stop_b: i32,
    legs: &[bool],
) -> i32 {
    let sched = schedule::ActiveModel {
        route_id: Set(route_id),
        weekday: Set(weekday),
        is_active: Set(true),
        created_at: Set(Utc::now()),
        deleted_at: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();

    for (i, is_round) in legs.iter().enumerate() {
        let leg = schedule_leg::ActiveModel {
            schedule_id: Set(sched.id),
            sort: Set(i as i32),
            is_round: Set(*is_round),
            departure_stop_id: Set(stop_a),
            arrival_stop_id: Set(stop_b),
            price: Set(100_000),
            vehicle_id: Set(vehicle_id),
            driver_id: Set(driver_id),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap();

        for (sort, (stop_id, time)) in [(stop_a, "08:00"), (stop_b, "12:00")].iter().enumerate() {
            schedule_stop::ActiveModel {
                leg_id: Set(leg.id),
                stop_id: Set(*stop_id),
                depart_time: Set(time.to_string()),
                sort: Set(sort as i32),
                created_at: Set(Utc::now()),
                ..Default::default()
            }
            .insert(db)
            .await
            .unwrap();
        }
    }
    sched.id
}

/// A trip with its seats already materialized, bypassing the generator.
pub(crate) async fn seed_trip(
    db: &DatabaseConnection,
    route_id: i32,
    base_price: i64,
    seats: usize,
    date: NaiveDate,
) -> (i32, Vec<i32>) {
    let trip_row = trip::ActiveModel {
        code: Set(codes::trip_code(date)),
        spj_code: Set(codes::manifest_code(date)),
        route_id: Set(route_id),
        date: Set(date),
        sort: Set(0),
        departure_stop_id: Set(1),
        departure_stop_name: Set("Terminal Kampung Rambutan".to_string()),
        departure_city: Set("Jakarta".to_string()),
        arrival_stop_id: Set(2),
        arrival_stop_name: Set("Terminal Leuwipanjang".to_string()),
        arrival_city: Set("Bandung".to_string()),
        departure_time: Set("08:00".to_string()),
        arrival_time: Set("12:00".to_string()),
        duration_hours: Set(4),
        capacity: Set(seats as i32),
        ticket_sold: Set(0),
        base_price: Set(base_price),
        vehicle_id: Set(1),
        vehicle_name: Set("Armada 01".to_string()),
        plate_number: Set("B 7001 XA".to_string()),
        driver_id: Set(1),
        driver_code: Set("DRV-001".to_string()),
        driver_name: Set("Pak Dedi".to_string()),
        status: Set("PENDING".to_string()),
        actual_departure_at: Set(None),
        actual_arrival_at: Set(None),
        created_at: Set(Utc::now()),
        deleted_at: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();

    let mut seat_ids = Vec::with_capacity(seats);
    for n in 0..seats {
        let seat = trip_seat::ActiveModel {
            trip_id: Set(trip_row.id),
            code: Set(format!("{}A", n + 1)),
            row: Set(n as i32 + 1),
            column: Set(1),
            is_avail: Set(true),
            status: Set("AVAILABLE".to_string()),
            hold_expires_at: Set(None),
            version: Set(0),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap();
        seat_ids.push(seat.id);
    }
    (trip_row.id, seat_ids)
}

pub(crate) async fn seed_customer(db: &DatabaseConnection) -> i32 {
    customer::ActiveModel {
        name: Set("Budi Santoso".to_string()),
        phone: Set("081234567890".to_string()),
        email: Set(None),
        address: Set(None),
        created_at: Set(Utc::now()),
        deleted_at: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
    .id
}

pub(crate) async fn seed_invoice(db: &DatabaseConnection, external_ref: &str) -> i32 {
    invoice::ActiveModel {
        external_ref: Set(external_ref.to_string()),
        gateway_invoice_id: Set(format!("inv_{external_ref}")),
        payment_url: Set("https://pay.test/checkout".to_string()),
        raw_status: Set("PENDING".to_string()),
        normalized_status: Set("PENDING".to_string()),
        paid_amount: Set(None),
        paid_at: Set(None),
        payment_method: Set(None),
        payment_channel: Set(None),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
    .id
}

#[allow(clippy::too_many_arguments)]
pub(crate) async fn seed_order(
    db: &DatabaseConnection,
    customer_id: i32,
    trip_id: i32,
    invoice_id: Option<i32>,
    status: &str,
    total: i64,
    discount: i64,
    subtotal: i64,
) -> i32 {
    order::ActiveModel {
        code: Set(codes::order_code()),
        customer_id: Set(customer_id),
        trip_id: Set(trip_id),
        invoice_id: Set(invoice_id),
        total: Set(total),
        discount: Set(discount),
        subtotal: Set(subtotal),
        status: Set(status.to_string()),
        canceled_at: Set(None),
        cancel_reason: Set(None),
        refund_bank_code: Set(None),
        refund_account_name: Set(None),
        refund_account_number: Set(None),
        disbursement_status: Set("NONE".to_string()),
        disbursement_response: Set(None),
        last_reminded_at: Set(None),
        created_at: Set(Utc::now()),
        deleted_at: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
    .id
}

pub(crate) async fn seed_order_item(
    db: &DatabaseConnection,
    order_id: i32,
    seat_id: i32,
    price: i64,
) {
    order_item::ActiveModel {
        order_id: Set(order_id),
        seat_id: Set(seat_id),
        passenger_name: Set("Budi Santoso".to_string()),
        passenger_phone: Set(None),
        passenger_address: Set(None),
        price: Set(price),
        discount: Set(0),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();
}

/// Gateway stub that records every request and always succeeds.
pub(crate) struct StubGateway {
    pub invoices: Mutex<Vec<InvoiceRequest>>,
    pub disbursements: Mutex<Vec<DisbursementRequest>>,
}

impl StubGateway {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            invoices: Mutex::new(Vec::new()),
            disbursements: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl PaymentGateway for StubGateway {
    async fn create_invoice(&self, request: &InvoiceRequest) -> DomainResult<InvoiceHandle> {
        self.invoices.lock().unwrap().push(request.clone());
        Ok(InvoiceHandle {
            gateway_invoice_id: format!("inv_{}", request.external_ref),
            payment_url: "https://pay.test/checkout".to_string(),
        })
    }

    async fn create_disbursement(
        &self,
        request: &DisbursementRequest,
    ) -> DomainResult<DisbursementOutcome> {
        self.disbursements.lock().unwrap().push(request.clone());
        Ok(DisbursementOutcome {
            success: true,
            raw_response: r#"{"status":"COMPLETED"}"#.to_string(),
        })
    }
}

/// Dispatcher stub that swallows every notification.
pub(crate) struct NullDispatcher;

#[async_trait]
impl NotificationDispatcher for NullDispatcher {
    async fn dispatch_in_app(&self, _notification: &InAppNotification) -> DomainResult<()> {
        Ok(())
    }

    async fn dispatch_email(&self, _email: &EmailNotification) -> DomainResult<()> {
        Ok(())
    }
}
