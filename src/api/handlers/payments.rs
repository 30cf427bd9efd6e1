//! Payment gateway webhook handler
//!
//! The gateway POSTs payment status callbacks here. The body is read raw so
//! the HMAC signature covers the exact bytes on the wire; only after the
//! signature checks out is the payload parsed and reconciled.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

use crate::api::dto::ApiResponse;
use crate::api::error::{domain_error, ApiError};
use crate::application::services::reconciliation::{CallbackPayload, ReconcileOutcome};
use crate::application::services::ReconciliationService;
use crate::domain::invoice::Invoice;
use crate::domain::{DomainError, RepositoryProvider};
use crate::infrastructure::payment::verify_signature;

/// Signature header set by the payment gateway.
pub const SIGNATURE_HEADER: &str = "x-callback-signature";

#[derive(Clone)]
pub struct PaymentApiState {
    pub repos: Arc<dyn RepositoryProvider>,
    pub reconciliation: Arc<ReconciliationService>,
    /// HMAC secret shared with the gateway; empty disables verification
    pub callback_secret: String,
}

/// Payment status callback from the gateway
#[derive(Debug, Deserialize, ToSchema)]
pub struct PaymentCallbackRequest {
    /// Our invoice reference, echoed back by the gateway
    pub external_ref: String,
    /// Gateway status string, recorded verbatim
    pub status: String,
    /// Amount actually paid, minor currency units
    pub paid_amount: Option<i64>,
    pub paid_at: Option<DateTime<Utc>>,
    pub payment_method: Option<String>,
    pub payment_channel: Option<String>,
}

/// Callback acknowledgement
#[derive(Debug, Serialize, ToSchema)]
pub struct CallbackAck {
    pub external_ref: String,
    /// `APPLIED` when side effects fired, `REPLAYED` for duplicates
    pub outcome: String,
}

/// Stored payment state for one invoice
#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentStatusDto {
    pub external_ref: String,
    /// Hosted payment page for the customer
    pub payment_url: String,
    /// Last raw status as reported by the gateway
    pub raw_status: String,
    /// `PAID`, `EXPIRED` or the raw status passed through
    pub normalized_status: String,
    pub paid_amount: Option<i64>,
    pub paid_at: Option<DateTime<Utc>>,
    pub payment_method: Option<String>,
    pub payment_channel: Option<String>,
}

impl From<Invoice> for PaymentStatusDto {
    fn from(i: Invoice) -> Self {
        Self {
            external_ref: i.external_ref,
            payment_url: i.payment_url,
            raw_status: i.raw_status,
            normalized_status: i.normalized_status,
            paid_amount: i.paid_amount,
            paid_at: i.paid_at,
            payment_method: i.payment_method,
            payment_channel: i.payment_channel,
        }
    }
}

/// Payment status for an invoice
///
/// Polled by the frontend after the payment redirect; reflects the latest
/// callback the gateway delivered.
#[utoipa::path(
    get,
    path = "/api/v1/payments/{external_ref}",
    tag = "Payments",
    params(("external_ref" = String, Path, description = "Invoice external reference")),
    responses(
        (status = 200, description = "Stored payment state", body = ApiResponse<PaymentStatusDto>),
        (status = 404, description = "Unknown external reference")
    )
)]
pub async fn get_payment_status(
    State(state): State<PaymentApiState>,
    Path(external_ref): Path<String>,
) -> Result<Json<ApiResponse<PaymentStatusDto>>, ApiError> {
    let invoice = state
        .repos
        .invoices()
        .find_by_external_ref(&external_ref)
        .await
        .map_err(domain_error)?
        .ok_or_else(|| {
            domain_error(DomainError::NotFound {
                entity: "Invoice",
                field: "external_ref",
                value: external_ref.clone(),
            })
        })?;

    Ok(Json(ApiResponse::success(PaymentStatusDto::from(invoice))))
}

/// Payment status callback
///
/// Idempotent: replays of an already-applied status refresh the stored raw
/// status and nothing else. Replays still return 200 so the gateway stops
/// retrying.
#[utoipa::path(
    post,
    path = "/api/v1/payments/callback",
    tag = "Payments",
    request_body = PaymentCallbackRequest,
    responses(
        (status = 200, description = "Callback processed or replayed", body = ApiResponse<CallbackAck>),
        (status = 400, description = "Body is not valid JSON"),
        (status = 401, description = "Missing or invalid signature"),
        (status = 404, description = "Unknown external reference")
    )
)]
pub async fn payment_callback(
    State(state): State<PaymentApiState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ApiResponse<CallbackAck>>, ApiError> {
    if !state.callback_secret.is_empty() {
        let provided = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        if !verify_signature(&state.callback_secret, &body, provided) {
            warn!("Payment callback rejected: bad signature");
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::error("invalid callback signature")),
            ));
        }
    }

    let request: PaymentCallbackRequest = serde_json::from_slice(&body).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format!("invalid callback body: {e}"))),
        )
    })?;

    let external_ref = request.external_ref.clone();
    let outcome = state
        .reconciliation
        .process_callback(CallbackPayload {
            external_ref: request.external_ref,
            raw_status: request.status,
            paid_amount: request.paid_amount,
            paid_at: request.paid_at,
            payment_method: request.payment_method,
            payment_channel: request.payment_channel,
        })
        .await
        .map_err(domain_error)?;

    let outcome = match outcome {
        ReconcileOutcome::Applied(_) => {
            metrics::counter!("payment_callbacks_total", "outcome" => "applied").increment(1);
            "APPLIED"
        }
        ReconcileOutcome::Replayed => {
            metrics::counter!("payment_callbacks_total", "outcome" => "replayed").increment(1);
            "REPLAYED"
        }
    };

    Ok(Json(ApiResponse::success(CallbackAck {
        external_ref,
        outcome: outcome.to_string(),
    })))
}
