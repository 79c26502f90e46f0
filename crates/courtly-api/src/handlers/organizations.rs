//! Read-only hierarchy endpoints. The catalog is visible to any
//! authenticated user; only writes are gated by role.

use crate::error::{ErrorResponse, HttpAppError};
use crate::extract::AuthenticatedUser;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use courtly_core::models::{Location, Organization};
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/v1/organizations/{id}",
    tag = "catalog",
    params(("id" = Uuid, Path, description = "Organization ID")),
    responses(
        (status = 200, description = "Organization found", body = Organization),
        (status = 404, description = "Organization not found", body = ErrorResponse)
    )
)]
pub async fn get_organization(
    State(state): State<Arc<AppState>>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let organization = state.catalog.get_organization(id).await?;
    Ok(Json(organization))
}

#[utoipa::path(
    get,
    path = "/api/v1/locations/{id}",
    tag = "catalog",
    params(("id" = Uuid, Path, description = "Location ID")),
    responses(
        (status = 200, description = "Location found", body = Location),
        (status = 404, description = "Location not found", body = ErrorResponse)
    )
)]
pub async fn get_location(
    State(state): State<Arc<AppState>>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let location = state.catalog.get_location(id).await?;
    Ok(Json(location))
}
