//! API Router with Swagger UI

use std::sync::Arc;

use axum::routing::{get, patch, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::dto::{ApiResponse, PaginatedResponse, PaginationParams};
use crate::api::handlers::{
    bookings, health, orders, payments, reminders, schedules, subscriptions, trips, vouchers,
};
use crate::application::services::{
    BookingService, CancellationService, ReconciliationService, ReminderService,
    SubscriptionService, TripGenerator,
};
use crate::config::AppConfig;
use crate::domain::RepositoryProvider;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Trips
        trips::list_trips,
        trips::get_trip,
        trips::update_trip_status,
        trips::generate_trips,
        schedules::preview_schedule,
        // Bookings
        bookings::create_booking,
        // Orders
        orders::get_order,
        orders::cancel_order,
        // Payments
        payments::payment_callback,
        payments::get_payment_status,
        // Vouchers
        vouchers::get_voucher,
        // Reminders
        reminders::departure_sweep,
        reminders::maintenance_sweep,
        // Subscriptions
        subscriptions::create_subscription,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            PaginatedResponse<trips::TripDto>,
            PaginationParams,
            // Trips
            trips::TripDto,
            trips::TripSeatDto,
            trips::TripPointDto,
            trips::TripDetailDto,
            trips::UpdateTripStatusRequest,
            trips::GenerateTripsRequest,
            trips::GenerationSummaryDto,
            schedules::StopDto,
            schedules::ScheduleStopDto,
            schedules::ScheduleLegDto,
            schedules::SchedulePreviewDto,
            // Bookings
            bookings::PassengerDto,
            bookings::CreateBookingRequest,
            bookings::BookingResponse,
            // Orders
            orders::OrderDto,
            orders::OrderItemDto,
            orders::RefundDto,
            orders::CancelOrderRequest,
            orders::CancellationReceiptDto,
            // Payments
            payments::PaymentCallbackRequest,
            payments::CallbackAck,
            payments::PaymentStatusDto,
            // Vouchers
            vouchers::VoucherDto,
            // Reminders
            reminders::SweepReportDto,
            // Subscriptions
            subscriptions::CreateSubscriptionRequest,
            subscriptions::SubscriptionResponse,
        )
    ),
    tags(
        (name = "Health", description = "Service liveness. Use for uptime and readiness monitoring."),
        (name = "Trips", description = "Dated departures generated from recurring weekday schedules. Listing, seat-map detail, lifecycle transitions (`PENDING` → `ONGOING` → `COMPLETED`) and the per-route generation trigger."),
        (name = "Bookings", description = "Order creation. Every booked seat is held (`ONHOLD`) until the gateway invoice is paid or the hold lapses; the response carries the hosted payment URL."),
        (name = "Orders", description = "Order detail and cancellation. Canceling a paid order with refund bank details triggers exactly one disbursement attempt."),
        (name = "Payments", description = "Payment-gateway webhook and invoice status polling. The webhook is HMAC-signed and idempotent per status transition; replays return 200 without side effects."),
        (name = "Vouchers", description = "Voucher preview for the checkout page. Redemption is applied inside the booking workflow."),
        (name = "Reminders", description = "Cron-triggered sweeps: departure reminders for paid customers and maintenance reminders for staff. Guarded by the `x-reminder-token` header."),
        (name = "Subscriptions", description = "Subscription purchases. Orders activate on payment; expiry counts from the payment instant."),
    ),
    info(
        title = "Armada Transit Core API",
        version = "0.1.0",
        description = "REST API for a scheduled passenger-transport operation: trip generation, \
seat inventory, booking, payment reconciliation, cancellation and reminder sweeps.

## Response format

Every REST response is wrapped in a standard envelope:
```json
{\"success\": true, \"data\": {...}, \"error\": null}
```

On failure:
```json
{\"success\": false, \"data\": null, \"error\": \"description\"}
```

## Pagination

List endpoints accept `page` (1-based) and `limit` (default 50, max 100).",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
#[allow(clippy::too_many_arguments)]
pub fn create_api_router(
    repos: Arc<dyn RepositoryProvider>,
    generator: Arc<TripGenerator>,
    booking: Arc<BookingService>,
    cancellation: Arc<CancellationService>,
    reconciliation: Arc<ReconciliationService>,
    reminder_service: Arc<ReminderService>,
    subscription_service: Arc<SubscriptionService>,
    config: &AppConfig,
    prometheus: PrometheusHandle,
) -> Router {
    let trip_state = trips::TripApiState {
        repos: repos.clone(),
        generator,
    };
    let booking_state = bookings::BookingApiState { booking };
    let order_state = orders::OrderApiState {
        repos: repos.clone(),
        cancellation,
    };
    let schedule_state = schedules::ScheduleApiState {
        repos: repos.clone(),
    };
    let voucher_state = vouchers::VoucherApiState {
        repos: repos.clone(),
    };
    let payment_state = payments::PaymentApiState {
        repos,
        reconciliation,
        callback_secret: config.payment.callback_secret.clone(),
    };
    let reminder_state = reminders::ReminderApiState {
        reminders: reminder_service,
        token: config.reminders.token.clone(),
    };
    let subscription_state = subscriptions::SubscriptionApiState {
        subscriptions: subscription_service,
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trip_routes = Router::new()
        .route("/", get(trips::list_trips))
        .route("/generate", post(trips::generate_trips))
        .route("/{id}", get(trips::get_trip))
        .route("/{id}/status", patch(trips::update_trip_status))
        .with_state(trip_state);

    let booking_routes = Router::new()
        .route("/", post(bookings::create_booking))
        .with_state(booking_state);

    let order_routes = Router::new()
        .route("/{id}", get(orders::get_order))
        .route("/{id}/cancel", post(orders::cancel_order))
        .with_state(order_state);

    let schedule_routes = Router::new()
        .route("/preview", get(schedules::preview_schedule))
        .with_state(schedule_state);

    let voucher_routes = Router::new()
        .route("/{code}", get(vouchers::get_voucher))
        .with_state(voucher_state);

    let payment_routes = Router::new()
        .route("/callback", post(payments::payment_callback))
        .route("/{external_ref}", get(payments::get_payment_status))
        .with_state(payment_state);

    let reminder_routes = Router::new()
        .route("/departure", post(reminders::departure_sweep))
        .route("/maintenance", post(reminders::maintenance_sweep))
        .with_state(reminder_state);

    let subscription_routes = Router::new()
        .route("/", post(subscriptions::create_subscription))
        .with_state(subscription_state);

    let swagger_routes = SwaggerUi::new("/docs")
        .url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        // Swagger UI
        .merge(swagger_routes)
        // Health + metrics
        .route("/health", get(health::health_check))
        .route(
            "/metrics",
            get(move || async move { prometheus.render() }),
        )
        // Trips + schedule preview
        .nest("/api/v1/trips", trip_routes)
        .nest("/api/v1/schedules", schedule_routes)
        // Vouchers
        .nest("/api/v1/vouchers", voucher_routes)
        // Bookings
        .nest("/api/v1/bookings", booking_routes)
        // Orders
        .nest("/api/v1/orders", order_routes)
        // Payments
        .nest("/api/v1/payments", payment_routes)
        // Reminders
        .nest("/api/v1/reminders", reminder_routes)
        // Subscriptions
        .nest("/api/v1/subscriptions", subscription_routes)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
