//! Trip REST API handlers
//!
//! Listing and detail for generated trips, lifecycle status transitions and
//! the on-demand generation trigger used by the nightly scheduler.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::api::dto::{ApiResponse, PaginatedResponse, PaginationParams};
use crate::api::error::{domain_error, ApiError};
use crate::api::validated_json::ValidatedJson;
use crate::application::services::TripGenerator;
use crate::domain::seat::Seat;
use crate::domain::trip::{Trip, TripPoint, TripStatus};
use crate::domain::{DomainError, RepositoryProvider};

#[derive(Clone)]
pub struct TripApiState {
    pub repos: Arc<dyn RepositoryProvider>,
    pub generator: Arc<TripGenerator>,
}

/// One dated departure
#[derive(Debug, Serialize, ToSchema)]
pub struct TripDto {
    /// Unique trip ID
    pub id: i32,
    /// Trip code, unique per departure
    pub code: String,
    /// Manifest code shared by every leg of the same direction and date
    pub spj_code: String,
    pub route_id: i32,
    /// Service date (ISO 8601 date)
    pub date: NaiveDate,
    pub departure_stop_name: String,
    pub departure_city: String,
    /// Scheduled departure time-of-day (`HH:MM`)
    pub departure_time: String,
    pub arrival_stop_name: String,
    pub arrival_city: String,
    /// Scheduled arrival time-of-day (`HH:MM`)
    pub arrival_time: String,
    /// Whole hours, rounded up
    pub duration_hours: i64,
    pub capacity: i32,
    pub ticket_sold: i32,
    pub seats_remaining: i32,
    /// Base fare in minor currency units
    pub base_price: i64,
    pub vehicle_name: String,
    pub vehicle_plate: String,
    pub driver_name: String,
    /// `PENDING`, `ONGOING`, `COMPLETED` or `CANCELLED`
    pub status: String,
    pub actual_departure_at: Option<DateTime<Utc>>,
    pub actual_arrival_at: Option<DateTime<Utc>>,
}

impl From<Trip> for TripDto {
    fn from(t: Trip) -> Self {
        let seats_remaining = t.seats_remaining();
        Self {
            id: t.id,
            code: t.code,
            spj_code: t.spj_code,
            route_id: t.route_id,
            date: t.date,
            departure_stop_name: t.departure_stop_name,
            departure_city: t.departure_city,
            departure_time: t.departure_time,
            arrival_stop_name: t.arrival_stop_name,
            arrival_city: t.arrival_city,
            arrival_time: t.arrival_time,
            duration_hours: t.duration_hours,
            capacity: t.capacity,
            ticket_sold: t.ticket_sold,
            seats_remaining,
            base_price: t.base_price,
            vehicle_name: t.vehicle_name,
            vehicle_plate: t.vehicle_plate,
            driver_name: t.driver_name,
            status: t.status.as_str().to_string(),
            actual_departure_at: t.actual_departure_at,
            actual_arrival_at: t.actual_arrival_at,
        }
    }
}

/// One seat on a trip
#[derive(Debug, Serialize, ToSchema)]
pub struct TripSeatDto {
    pub id: i32,
    /// Seat label, e.g. `A1`
    pub code: String,
    pub row: i32,
    pub column: i32,
    /// `AVAILABLE`, `ONHOLD`, `PAID` or `CHECKIN`
    pub status: String,
    /// Set while the seat is ONHOLD
    pub hold_expires_at: Option<DateTime<Utc>>,
}

impl From<Seat> for TripSeatDto {
    fn from(s: Seat) -> Self {
        Self {
            id: s.id,
            code: s.code,
            row: s.row,
            column: s.column,
            status: s.status.as_str().to_string(),
            hold_expires_at: s.hold_expires_at,
        }
    }
}

/// One waypoint on a trip's route
#[derive(Debug, Serialize, ToSchema)]
pub struct TripPointDto {
    pub stop_id: i32,
    pub stop_name: String,
    pub city: String,
    /// Scheduled departure time-of-day (`HH:MM`)
    pub depart_time: String,
    pub sort: i32,
}

impl From<TripPoint> for TripPointDto {
    fn from(p: TripPoint) -> Self {
        Self {
            stop_id: p.stop_id,
            stop_name: p.stop_name,
            city: p.city,
            depart_time: p.depart_time,
            sort: p.sort,
        }
    }
}

/// Trip detail with its seat map and waypoints
#[derive(Debug, Serialize, ToSchema)]
pub struct TripDetailDto {
    pub trip: TripDto,
    pub seats: Vec<TripSeatDto>,
    pub points: Vec<TripPointDto>,
}

/// Trip list filters
#[derive(Debug, Deserialize, IntoParams)]
pub struct TripListQuery {
    /// Filter by route
    pub route_id: Option<i32>,
    /// Filter by service date (ISO 8601 date)
    pub date: Option<NaiveDate>,
}

/// Lifecycle transition request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateTripStatusRequest {
    /// Target status: `PENDING`, `ONGOING`, `COMPLETED` or `CANCELLED`
    #[validate(length(min = 1))]
    pub status: String,
}

/// Generation trigger request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GenerateTripsRequest {
    /// Route to expand schedules for
    #[validate(range(min = 1))]
    pub route_id: i32,
    /// First service date of the span (ISO 8601 date)
    pub start_date: NaiveDate,
    /// Additional days after `start_date`; 0 generates the one day
    #[serde(default)]
    #[validate(range(max = 31))]
    pub days: u32,
}

/// Result of one generation run
#[derive(Debug, Serialize, ToSchema)]
pub struct GenerationSummaryDto {
    pub route_id: i32,
    pub start_date: NaiveDate,
    pub days: u32,
    /// Trips inserted by this run
    pub trips_created: usize,
    /// Days skipped for having no schedule or already holding trips
    pub days_skipped: usize,
}

/// List trips
///
/// Returns non-deleted trips ordered by date then route position,
/// optionally filtered by route and/or service date.
#[utoipa::path(
    get,
    path = "/api/v1/trips",
    tag = "Trips",
    params(TripListQuery, PaginationParams),
    responses(
        (status = 200, description = "One page of trips", body = ApiResponse<PaginatedResponse<TripDto>>)
    )
)]
pub async fn list_trips(
    State(state): State<TripApiState>,
    Query(filter): Query<TripListQuery>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PaginatedResponse<TripDto>>>, ApiError> {
    let trips = state
        .repos
        .trips()
        .list(filter.route_id, filter.date)
        .await
        .map_err(domain_error)?;

    let total = trips.len() as u64;
    let page = pagination.page.max(1);
    let limit = pagination.limit.clamp(1, 100);
    let offset = ((page - 1) * limit) as usize;

    let items: Vec<TripDto> = trips
        .into_iter()
        .skip(offset)
        .take(limit as usize)
        .map(TripDto::from)
        .collect();

    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        items, total, page, limit,
    ))))
}

/// Trip detail
///
/// Returns the trip with its full seat map and waypoint list.
#[utoipa::path(
    get,
    path = "/api/v1/trips/{id}",
    tag = "Trips",
    params(("id" = i32, Path, description = "Trip ID")),
    responses(
        (status = 200, description = "Trip detail", body = ApiResponse<TripDetailDto>),
        (status = 404, description = "Trip not found")
    )
)]
pub async fn get_trip(
    State(state): State<TripApiState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<TripDetailDto>>, ApiError> {
    let trip = state
        .repos
        .trips()
        .find_by_id(id)
        .await
        .map_err(domain_error)?
        .ok_or_else(|| {
            domain_error(DomainError::NotFound {
                entity: "Trip",
                field: "id",
                value: id.to_string(),
            })
        })?;

    let seats = state
        .repos
        .seats()
        .list_for_trip(id)
        .await
        .map_err(domain_error)?;
    let points = state.repos.trips().points(id).await.map_err(domain_error)?;

    Ok(Json(ApiResponse::success(TripDetailDto {
        trip: TripDto::from(trip),
        seats: seats.into_iter().map(TripSeatDto::from).collect(),
        points: points.into_iter().map(TripPointDto::from).collect(),
    })))
}

/// Transition a trip's lifecycle status
///
/// `ONGOING` stamps the actual departure on first entry; `COMPLETED`
/// stamps the actual arrival. Stamps never move once set.
#[utoipa::path(
    patch,
    path = "/api/v1/trips/{id}/status",
    tag = "Trips",
    params(("id" = i32, Path, description = "Trip ID")),
    request_body = UpdateTripStatusRequest,
    responses(
        (status = 200, description = "Updated trip", body = ApiResponse<TripDto>),
        (status = 400, description = "Unknown status value"),
        (status = 404, description = "Trip not found")
    )
)]
pub async fn update_trip_status(
    State(state): State<TripApiState>,
    Path(id): Path<i32>,
    ValidatedJson(body): ValidatedJson<UpdateTripStatusRequest>,
) -> Result<Json<ApiResponse<TripDto>>, ApiError> {
    let to = match body.status.as_str() {
        "PENDING" => TripStatus::Pending,
        "ONGOING" => TripStatus::Ongoing,
        "COMPLETED" => TripStatus::Completed,
        "CANCELLED" => TripStatus::Cancelled,
        other => {
            return Err(domain_error(DomainError::Validation(format!(
                "unknown trip status: {other}"
            ))))
        }
    };

    let mut trip = state
        .repos
        .trips()
        .find_by_id(id)
        .await
        .map_err(domain_error)?
        .ok_or_else(|| {
            domain_error(DomainError::NotFound {
                entity: "Trip",
                field: "id",
                value: id.to_string(),
            })
        })?;

    trip.transition(to, Utc::now());
    state
        .repos
        .trips()
        .update_status(id, trip.status, trip.actual_departure_at, trip.actual_arrival_at)
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(TripDto::from(trip))))
}

/// Generate trips for a route over a span of days
///
/// Expands the route's schedules for every matching weekday from
/// `start_date` through `start_date + days`. Idempotent: days that
/// already have trips are skipped.
#[utoipa::path(
    post,
    path = "/api/v1/trips/generate",
    tag = "Trips",
    request_body = GenerateTripsRequest,
    responses(
        (status = 200, description = "Generation summary", body = ApiResponse<GenerationSummaryDto>)
    )
)]
pub async fn generate_trips(
    State(state): State<TripApiState>,
    ValidatedJson(body): ValidatedJson<GenerateTripsRequest>,
) -> Result<(StatusCode, Json<ApiResponse<GenerationSummaryDto>>), ApiError> {
    let summary = state
        .generator
        .generate(body.route_id, body.start_date, body.days)
        .await
        .map_err(domain_error)?;

    metrics::counter!("trips_generated_total").increment(summary.trips_created as u64);

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(GenerationSummaryDto {
            route_id: body.route_id,
            start_date: body.start_date,
            days: body.days,
            trips_created: summary.trips_created,
            days_skipped: summary.days_skipped,
        })),
    ))
}
