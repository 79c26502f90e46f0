//! Booking endpoints: create, confirm, cancel, get, list.
//!
//! Handlers load the caller's role facts fresh on every request, then hand
//! off to the scheduler. All conflict detection and transition atomicity is
//! below the HTTP layer; these functions only translate between HTTP and
//! the service API.

use crate::error::{ErrorResponse, HttpAppError};
use crate::extract::AuthenticatedUser;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use courtly_core::models::{Booking, BookingFilter, Page};
use http::StatusCode;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBookingRequest {
    pub resource_id: Uuid,
    /// Inclusive start of the requested slot.
    pub start_time: DateTime<Utc>,
    /// Exclusive end of the requested slot.
    pub end_time: DateTime<Utc>,
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    tag = "bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking created in pending", body = Booking),
        (status = 400, description = "Invalid interval or venue not bookable", body = ErrorResponse),
        (status = 403, description = "Not authorized", body = ErrorResponse),
        (status = 404, description = "Resource not found", body = ErrorResponse),
        (status = 409, description = "Interval overlaps an existing booking", body = ErrorResponse)
    )
)]
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Json(body): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let actor = state.roles.load_actor(user.0).await?;
    let booking = state
        .scheduler
        .create_booking(&actor, body.resource_id, body.start_time, body.end_time)
        .await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings/{id}/confirm",
    tag = "bookings",
    params(("id" = Uuid, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking confirmed", body = Booking),
        (status = 403, description = "Not authorized", body = ErrorResponse),
        (status = 404, description = "Booking not found", body = ErrorResponse),
        (status = 422, description = "Booking is not pending", body = ErrorResponse)
    )
)]
pub async fn confirm_booking(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let actor = state.roles.load_actor(user.0).await?;
    let booking = state.scheduler.confirm_booking(&actor, id).await?;
    Ok(Json(booking))
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings/{id}/cancel",
    tag = "bookings",
    params(("id" = Uuid, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking cancelled", body = Booking),
        (status = 403, description = "Not authorized", body = ErrorResponse),
        (status = 404, description = "Booking not found", body = ErrorResponse),
        (status = 422, description = "Booking already cancelled", body = ErrorResponse)
    )
)]
pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let actor = state.roles.load_actor(user.0).await?;
    let booking = state.scheduler.cancel_booking(&actor, id).await?;
    Ok(Json(booking))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings/{id}",
    tag = "bookings",
    params(("id" = Uuid, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking found", body = Booking),
        (status = 404, description = "Booking not found or not visible", body = ErrorResponse)
    )
)]
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let actor = state.roles.load_actor(user.0).await?;
    let booking = state.scheduler.get_booking(&actor, id).await?;
    Ok(Json(booking))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    tag = "bookings",
    params(BookingFilter),
    responses(
        (status = 200, description = "Bookings visible to the caller", body = Page<Booking>)
    )
)]
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Query(filter): Query<BookingFilter>,
) -> Result<impl IntoResponse, HttpAppError> {
    let actor = state.roles.load_actor(user.0).await?;
    let page = state.scheduler.list_bookings(&actor, &filter).await?;
    Ok(Json(page))
}
