//! Booking REST API handlers

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::dto::ApiResponse;
use crate::api::error::{domain_error, ApiError};
use crate::api::validated_json::ValidatedJson;
use crate::application::services::booking::{BookingRequest, PassengerSelection};
use crate::application::services::BookingService;

#[derive(Clone)]
pub struct BookingApiState {
    pub booking: Arc<BookingService>,
}

/// One passenger occupying one seat
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct PassengerDto {
    /// Seat ID on the trip
    #[validate(range(min = 1))]
    pub seat_id: i32,
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// Seat price in minor units; defaults to the trip's base price
    #[validate(range(min = 0))]
    pub price: Option<i64>,
}

/// Booking creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookingRequest {
    #[validate(range(min = 1))]
    pub trip_id: i32,
    #[validate(length(min = 1, max = 120))]
    pub customer_name: String,
    /// Customer phone, the lookup key for returning customers
    #[validate(length(min = 6, max = 20))]
    pub customer_phone: String,
    #[validate(email)]
    pub customer_email: Option<String>,
    pub customer_address: Option<String>,
    /// One entry per seat being booked
    #[validate(length(min = 1, max = 60), nested)]
    pub passengers: Vec<PassengerDto>,
    /// Optional voucher code applied to the whole order
    pub voucher_code: Option<String>,
}

/// Created booking with the hosted payment URL
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingResponse {
    pub order_id: i32,
    pub order_code: String,
    /// Reference the payment gateway echoes back in callbacks
    pub external_ref: String,
    /// Hosted payment page for the customer
    pub payment_url: String,
    /// Sum of seat prices, minor currency units
    pub total: i64,
    pub discount: i64,
    /// Total after discount
    pub subtotal: i64,
    /// Subtotal plus the admin fee; the invoiced amount
    pub amount_due: i64,
    /// Instant the seat holds lapse if the invoice stays unpaid
    pub hold_expires_at: DateTime<Utc>,
}

/// Create a booking
///
/// Places every requested seat ON HOLD, creates a payment-gateway invoice
/// and returns the hosted payment URL. Any seat lost to a concurrent
/// booking aborts the whole order with a 409.
#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    tag = "Bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Order created, seats held", body = ApiResponse<BookingResponse>),
        (status = 404, description = "Trip not found"),
        (status = 409, description = "Trip closed or a seat was taken"),
        (status = 502, description = "Payment gateway unavailable")
    )
)]
pub async fn create_booking(
    State(state): State<BookingApiState>,
    ValidatedJson(body): ValidatedJson<CreateBookingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BookingResponse>>), ApiError> {
    let request = BookingRequest {
        trip_id: body.trip_id,
        customer_name: body.customer_name,
        customer_phone: body.customer_phone,
        customer_email: body.customer_email,
        customer_address: body.customer_address,
        passengers: body
            .passengers
            .into_iter()
            .map(|p| PassengerSelection {
                seat_id: p.seat_id,
                name: p.name,
                phone: p.phone,
                address: p.address,
                price: p.price,
            })
            .collect(),
        voucher_code: body.voucher_code,
    };

    let confirmation = state
        .booking
        .create_order(request)
        .await
        .map_err(domain_error)?;

    metrics::counter!("orders_created_total").increment(1);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(BookingResponse {
            order_id: confirmation.order_id,
            order_code: confirmation.order_code,
            external_ref: confirmation.external_ref,
            payment_url: confirmation.payment_url,
            total: confirmation.total,
            discount: confirmation.discount,
            subtotal: confirmation.subtotal,
            amount_due: confirmation.amount_due,
            hold_expires_at: confirmation.hold_expires_at,
        })),
    ))
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn passenger(seat_id: i32, name: &str) -> PassengerDto {
        PassengerDto {
            seat_id,
            name: name.to_string(),
            phone: None,
            address: None,
            price: None,
        }
    }

    fn request(passengers: Vec<PassengerDto>) -> CreateBookingRequest {
        CreateBookingRequest {
            trip_id: 1,
            customer_name: "Budi Santoso".to_string(),
            customer_phone: "081234567890".to_string(),
            customer_email: None,
            customer_address: None,
            passengers,
            voucher_code: None,
        }
    }

    #[test]
    fn valid_request_passes_validation() {
        let req = request(vec![passenger(1, "Budi Santoso")]);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn empty_passenger_list_is_rejected() {
        let req = request(vec![]);
        assert!(req.validate().is_err());
    }

    #[test]
    fn nested_passenger_fields_are_validated() {
        let req = request(vec![passenger(0, "")]);
        assert!(req.validate().is_err());

        let mut bad_price = request(vec![passenger(1, "Budi Santoso")]);
        bad_price.passengers[0].price = Some(-1);
        assert!(bad_price.validate().is_err());
    }
}
