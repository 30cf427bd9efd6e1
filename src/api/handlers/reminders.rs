//! Reminder sweep triggers
//!
//! Both sweeps are fired over HTTP by an external scheduler (cron). The
//! shared token in the `x-reminder-token` header keeps the endpoints from
//! being triggered by strangers; the sweeps themselves are idempotent, so
//! an accidental double fire is harmless.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::dto::ApiResponse;
use crate::api::error::{domain_error, ApiError};
use crate::application::services::reminder::SweepReport;
use crate::application::services::ReminderService;

/// Shared-secret header checked on every sweep trigger.
pub const TOKEN_HEADER: &str = "x-reminder-token";

#[derive(Clone)]
pub struct ReminderApiState {
    pub reminders: Arc<ReminderService>,
    pub token: String,
}

/// Counters from one sweep run
#[derive(Debug, Serialize, ToSchema)]
pub struct SweepReportDto {
    /// Rows scanned
    pub checked: usize,
    /// Rows inside the reminder window
    pub due: usize,
    /// Notifications actually delivered
    pub sent: usize,
}

impl From<SweepReport> for SweepReportDto {
    fn from(r: SweepReport) -> Self {
        Self {
            checked: r.checked,
            due: r.due,
            sent: r.sent,
        }
    }
}

fn check_token(state: &ReminderApiState, headers: &HeaderMap) -> Result<(), ApiError> {
    let provided = headers
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if provided != state.token {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error("invalid reminder token")),
        ));
    }
    Ok(())
}

/// Run the departure reminder sweep
///
/// Notifies paid customers whose trip departs within the next 24 hours.
/// Each order is reminded at most once, ever.
#[utoipa::path(
    post,
    path = "/api/v1/reminders/departure",
    tag = "Reminders",
    responses(
        (status = 200, description = "Sweep counters", body = ApiResponse<SweepReportDto>),
        (status = 401, description = "Missing or wrong token")
    )
)]
pub async fn departure_sweep(
    State(state): State<ReminderApiState>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<SweepReportDto>>, ApiError> {
    check_token(&state, &headers)?;
    let report = state
        .reminders
        .departure_sweep()
        .await
        .map_err(domain_error)?;
    metrics::counter!("reminders_sent_total", "sweep" => "departure").increment(report.sent as u64);
    Ok(Json(ApiResponse::success(SweepReportDto::from(report))))
}

/// Run the maintenance reminder sweep
///
/// Notifies staff about vehicles near an odometer service threshold or
/// with an inspection/registration document expiring soon. Watermarks on
/// the vehicle rows keep repeats from double-sending.
#[utoipa::path(
    post,
    path = "/api/v1/reminders/maintenance",
    tag = "Reminders",
    responses(
        (status = 200, description = "Sweep counters", body = ApiResponse<SweepReportDto>),
        (status = 401, description = "Missing or wrong token")
    )
)]
pub async fn maintenance_sweep(
    State(state): State<ReminderApiState>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<SweepReportDto>>, ApiError> {
    check_token(&state, &headers)?;
    let report = state
        .reminders
        .maintenance_sweep()
        .await
        .map_err(domain_error)?;
    metrics::counter!("reminders_sent_total", "sweep" => "maintenance")
        .increment(report.sent as u64);
    Ok(Json(ApiResponse::success(SweepReportDto::from(report))))
}
