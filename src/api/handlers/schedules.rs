//! Schedule preview handler
//!
//! Shows the recurring template that would drive generation for a given
//! route and date: the matching weekday schedule with its legs and ordered
//! stop lists, stop names resolved from master data.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::api::dto::ApiResponse;
use crate::api::error::{domain_error, ApiError};
use crate::domain::schedule::weekday_index;
use crate::domain::{DomainError, RepositoryProvider};

#[derive(Clone)]
pub struct ScheduleApiState {
    pub repos: Arc<dyn RepositoryProvider>,
}

/// A stop from master data
#[derive(Debug, Serialize, ToSchema)]
pub struct StopDto {
    pub id: i32,
    pub name: String,
    pub city: String,
}

/// One stop of a leg's ordered stop list
#[derive(Debug, Serialize, ToSchema)]
pub struct ScheduleStopDto {
    pub stop: StopDto,
    /// Scheduled departure time-of-day (`HH:MM`)
    pub depart_time: String,
    pub sort: i32,
}

/// One directional leg of the schedule
#[derive(Debug, Serialize, ToSchema)]
pub struct ScheduleLegDto {
    pub sort: i32,
    /// Return-direction legs share one manifest code per date
    pub is_round: bool,
    pub departure_stop: StopDto,
    pub arrival_stop: StopDto,
    /// Base fare in minor currency units
    pub price: i64,
    pub vehicle_id: i32,
    pub driver_id: i32,
    pub stops: Vec<ScheduleStopDto>,
}

/// The schedule that would generate trips for the requested date
#[derive(Debug, Serialize, ToSchema)]
pub struct SchedulePreviewDto {
    pub id: i32,
    pub route_id: i32,
    /// 0 = Monday .. 6 = Sunday
    pub weekday: i32,
    pub legs: Vec<ScheduleLegDto>,
}

/// Schedule preview query
#[derive(Debug, Deserialize, IntoParams)]
pub struct SchedulePreviewQuery {
    pub route_id: i32,
    /// Service date; the matching weekday template is returned
    pub date: NaiveDate,
}

/// Preview the schedule for a route and date
///
/// Returns 404 when no active schedule covers the date's weekday, meaning
/// generation would produce nothing for it.
#[utoipa::path(
    get,
    path = "/api/v1/schedules/preview",
    tag = "Trips",
    params(SchedulePreviewQuery),
    responses(
        (status = 200, description = "Matching schedule template", body = ApiResponse<SchedulePreviewDto>),
        (status = 404, description = "No active schedule for this route and weekday")
    )
)]
pub async fn preview_schedule(
    State(state): State<ScheduleApiState>,
    Query(query): Query<SchedulePreviewQuery>,
) -> Result<Json<ApiResponse<SchedulePreviewDto>>, ApiError> {
    let weekday = weekday_index(query.date);
    let schedule = state
        .repos
        .schedules()
        .find_active(query.route_id, weekday)
        .await
        .map_err(domain_error)?
        .ok_or_else(|| {
            domain_error(DomainError::NotFound {
                entity: "Schedule",
                field: "route_id",
                value: query.route_id.to_string(),
            })
        })?;

    let mut legs = Vec::new();
    for leg in state
        .repos
        .schedules()
        .legs(schedule.id)
        .await
        .map_err(domain_error)?
    {
        let departure_stop = resolve_stop(&state, leg.departure_stop_id).await?;
        let arrival_stop = resolve_stop(&state, leg.arrival_stop_id).await?;

        let mut stops = Vec::new();
        for stop in state
            .repos
            .schedules()
            .stops_for_leg(leg.id)
            .await
            .map_err(domain_error)?
        {
            stops.push(ScheduleStopDto {
                stop: resolve_stop(&state, stop.stop_id).await?,
                depart_time: stop.depart_time,
                sort: stop.sort,
            });
        }

        legs.push(ScheduleLegDto {
            sort: leg.sort,
            is_round: leg.is_round,
            departure_stop,
            arrival_stop,
            price: leg.price,
            vehicle_id: leg.vehicle_id,
            driver_id: leg.driver_id,
            stops,
        });
    }

    Ok(Json(ApiResponse::success(SchedulePreviewDto {
        id: schedule.id,
        route_id: schedule.route_id,
        weekday: schedule.weekday,
        legs,
    })))
}

async fn resolve_stop(state: &ScheduleApiState, stop_id: i32) -> Result<StopDto, ApiError> {
    let stop = state
        .repos
        .schedules()
        .find_stop(stop_id)
        .await
        .map_err(domain_error)?
        .ok_or_else(|| {
            domain_error(DomainError::NotFound {
                entity: "Stop",
                field: "id",
                value: stop_id.to_string(),
            })
        })?;
    Ok(StopDto {
        id: stop.id,
        name: stop.name,
        city: stop.city,
    })
}
