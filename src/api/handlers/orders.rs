//! Order REST API handlers

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::dto::ApiResponse;
use crate::api::error::{domain_error, ApiError};
use crate::api::validated_json::ValidatedJson;
use crate::application::services::cancellation::{CancellationRequest, RefundDetails};
use crate::application::services::CancellationService;
use crate::domain::order::{Order, OrderItem};
use crate::domain::{DomainError, RepositoryProvider};

#[derive(Clone)]
pub struct OrderApiState {
    pub repos: Arc<dyn RepositoryProvider>,
    pub cancellation: Arc<CancellationService>,
}

/// One ticket on an order
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderItemDto {
    pub seat_id: i32,
    pub passenger_name: String,
    pub passenger_phone: Option<String>,
    /// Minor currency units
    pub price: i64,
    pub discount: i64,
}

impl From<OrderItem> for OrderItemDto {
    fn from(i: OrderItem) -> Self {
        Self {
            seat_id: i.seat_id,
            passenger_name: i.passenger_name,
            passenger_phone: i.passenger_phone,
            price: i.price,
            discount: i.discount,
        }
    }
}

/// Order detail
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderDto {
    pub id: i32,
    pub code: String,
    pub customer_id: i32,
    pub trip_id: i32,
    /// `PENDING`, `PAID`, `CANCELED` or `EXPIRED`
    pub status: String,
    /// Minor currency units
    pub subtotal: i64,
    pub discount: i64,
    pub total: i64,
    /// Refund payout state: `NONE`, `SETTLED` or `FAILED`
    pub disbursement_status: String,
    pub canceled_at: Option<DateTime<Utc>>,
    pub cancel_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItemDto>,
}

impl OrderDto {
    fn from_parts(order: Order, items: Vec<OrderItem>) -> Self {
        Self {
            id: order.id,
            code: order.code,
            customer_id: order.customer_id,
            trip_id: order.trip_id,
            status: order.status.as_str().to_string(),
            subtotal: order.subtotal,
            discount: order.discount,
            total: order.total,
            disbursement_status: order.disbursement_status.as_str().to_string(),
            canceled_at: order.canceled_at,
            cancel_reason: order.cancel_reason,
            created_at: order.created_at,
            items: items.into_iter().map(OrderItemDto::from).collect(),
        }
    }
}

/// Refund bank details
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RefundDto {
    #[validate(length(min = 2, max = 20))]
    pub bank_code: String,
    #[validate(length(min = 1, max = 120))]
    pub account_name: String,
    #[validate(length(min = 4, max = 34))]
    pub account_number: String,
}

/// Cancellation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CancelOrderRequest {
    #[validate(length(min = 1, max = 500))]
    pub reason: String,
    /// Bank details for the refund payout; required to refund a paid order
    #[validate(nested)]
    pub refund: Option<RefundDto>,
}

/// Cancellation result
#[derive(Debug, Serialize, ToSchema)]
pub struct CancellationReceiptDto {
    pub order_id: i32,
    pub order_code: String,
    /// Seats returned to inventory by this cancellation
    pub seats_released: usize,
    /// `NONE` when no payout was requested, otherwise `SETTLED` or `FAILED`
    pub disbursement_status: String,
}

/// Order detail
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    tag = "Orders",
    params(("id" = i32, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order with its tickets", body = ApiResponse<OrderDto>),
        (status = 404, description = "Order not found")
    )
)]
pub async fn get_order(
    State(state): State<OrderApiState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<OrderDto>>, ApiError> {
    let order = state
        .repos
        .orders()
        .find_by_id(id)
        .await
        .map_err(domain_error)?
        .ok_or_else(|| {
            domain_error(DomainError::NotFound {
                entity: "Order",
                field: "id",
                value: id.to_string(),
            })
        })?;

    let items = state.repos.orders().items(id).await.map_err(domain_error)?;

    Ok(Json(ApiResponse::success(OrderDto::from_parts(order, items))))
}

/// Cancel an order
///
/// Releases the order's seats back to inventory. A paid order with refund
/// bank details also gets exactly one disbursement attempt; a failed payout
/// is recorded for manual follow-up and never blocks the cancellation.
#[utoipa::path(
    post,
    path = "/api/v1/orders/{id}/cancel",
    tag = "Orders",
    params(("id" = i32, Path, description = "Order ID")),
    request_body = CancelOrderRequest,
    responses(
        (status = 200, description = "Cancellation receipt", body = ApiResponse<CancellationReceiptDto>),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order already canceled or expired")
    )
)]
pub async fn cancel_order(
    State(state): State<OrderApiState>,
    Path(id): Path<i32>,
    ValidatedJson(body): ValidatedJson<CancelOrderRequest>,
) -> Result<Json<ApiResponse<CancellationReceiptDto>>, ApiError> {
    let receipt = state
        .cancellation
        .cancel_order(CancellationRequest {
            order_id: id,
            reason: body.reason,
            refund: body.refund.map(|r| RefundDetails {
                bank_code: r.bank_code,
                account_name: r.account_name,
                account_number: r.account_number,
            }),
        })
        .await
        .map_err(domain_error)?;

    metrics::counter!("orders_canceled_total").increment(1);

    Ok(Json(ApiResponse::success(CancellationReceiptDto {
        order_id: receipt.order_id,
        order_code: receipt.order_code,
        seats_released: receipt.seats_released,
        disbursement_status: receipt.disbursement_status.as_str().to_string(),
    })))
}
