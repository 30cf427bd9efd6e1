//! Voucher preview handler
//!
//! Lets the checkout page validate a voucher code before submitting a
//! booking. Read-only; redemption happens inside the booking workflow.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::dto::ApiResponse;
use crate::api::error::{domain_error, ApiError};
use crate::domain::{DomainError, RepositoryProvider};

#[derive(Clone)]
pub struct VoucherApiState {
    pub repos: Arc<dyn RepositoryProvider>,
}

/// Voucher detail with a computed redeemable flag
#[derive(Debug, Serialize, ToSchema)]
pub struct VoucherDto {
    pub code: String,
    /// `PERCENT` (value is 0-100) or `FLAT` (value in minor currency units)
    pub kind: String,
    pub value: i64,
    pub is_active: bool,
    pub expires_at: Option<DateTime<Utc>>,
    /// Whether the voucher would apply right now
    pub redeemable: bool,
}

/// Voucher preview
#[utoipa::path(
    get,
    path = "/api/v1/vouchers/{code}",
    tag = "Vouchers",
    params(("code" = String, Path, description = "Voucher code")),
    responses(
        (status = 200, description = "Voucher detail", body = ApiResponse<VoucherDto>),
        (status = 404, description = "Voucher not found")
    )
)]
pub async fn get_voucher(
    State(state): State<VoucherApiState>,
    Path(code): Path<String>,
) -> Result<Json<ApiResponse<VoucherDto>>, ApiError> {
    let voucher = state
        .repos
        .vouchers()
        .find_by_code(&code)
        .await
        .map_err(domain_error)?
        .ok_or_else(|| {
            domain_error(DomainError::NotFound {
                entity: "Voucher",
                field: "code",
                value: code.clone(),
            })
        })?;

    let redeemable = voucher.is_redeemable(Utc::now());
    Ok(Json(ApiResponse::success(VoucherDto {
        code: voucher.code,
        kind: voucher.kind.as_str().to_string(),
        value: voucher.value,
        is_active: voucher.is_active,
        expires_at: voucher.expires_at,
        redeemable,
    })))
}
