//! Subscription REST API handlers

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::dto::ApiResponse;
use crate::api::error::{domain_error, ApiError};
use crate::api::validated_json::ValidatedJson;
use crate::application::services::subscriptions::SubscriptionRequest;
use crate::application::services::SubscriptionService;

#[derive(Clone)]
pub struct SubscriptionApiState {
    pub subscriptions: Arc<SubscriptionService>,
}

/// Subscription purchase request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSubscriptionRequest {
    #[validate(range(min = 1))]
    pub customer_id: i32,
    /// Subscription length in whole months
    #[validate(range(min = 1, max = 36))]
    pub duration_months: u32,
    /// Price in minor currency units
    #[validate(range(min = 1))]
    pub amount: i64,
}

/// Created subscription order with the hosted payment URL
#[derive(Debug, Serialize, ToSchema)]
pub struct SubscriptionResponse {
    pub subscription_id: i32,
    pub code: String,
    /// Reference the payment gateway echoes back in callbacks
    pub external_ref: String,
    pub payment_url: String,
}

/// Purchase a subscription
///
/// Creates a PENDING subscription order and a gateway invoice. The
/// subscription activates when the payment callback lands; its expiry is
/// computed from the payment instant, not from purchase.
#[utoipa::path(
    post,
    path = "/api/v1/subscriptions",
    tag = "Subscriptions",
    request_body = CreateSubscriptionRequest,
    responses(
        (status = 201, description = "Subscription order created", body = ApiResponse<SubscriptionResponse>),
        (status = 404, description = "Customer not found"),
        (status = 502, description = "Payment gateway unavailable")
    )
)]
pub async fn create_subscription(
    State(state): State<SubscriptionApiState>,
    ValidatedJson(body): ValidatedJson<CreateSubscriptionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SubscriptionResponse>>), ApiError> {
    let confirmation = state
        .subscriptions
        .create(SubscriptionRequest {
            customer_id: body.customer_id,
            duration_months: body.duration_months,
            amount: body.amount,
        })
        .await
        .map_err(domain_error)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(SubscriptionResponse {
            subscription_id: confirmation.subscription_id,
            code: confirmation.code,
            external_ref: confirmation.external_ref,
            payment_url: confirmation.payment_url,
        })),
    ))
}
