//! Resource and resource-type endpoints.

use crate::error::{ErrorResponse, HttpAppError};
use crate::extract::AuthenticatedUser;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use courtly_core::models::{NewResource, Resource, ResourceType, ResourceUpdate};
use courtly_core::AppError;
use http::StatusCode;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateResourceTypeRequest {
    pub organization_id: Uuid,
    #[validate(length(min = 1, max = 120))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateResourceRequest {
    pub location_id: Uuid,
    pub resource_type_id: Uuid,
    #[validate(length(min = 1, max = 120))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateResourceRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    pub resource_type_id: Option<Uuid>,
    pub is_active: Option<bool>,
}

#[utoipa::path(
    post,
    path = "/api/v1/resource-types",
    tag = "catalog",
    request_body = CreateResourceTypeRequest,
    responses(
        (status = 201, description = "Resource type created", body = ResourceType),
        (status = 403, description = "Not authorized", body = ErrorResponse),
        (status = 404, description = "Organization not found", body = ErrorResponse)
    )
)]
pub async fn create_resource_type(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Json(body): Json<CreateResourceTypeRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    body.validate().map_err(AppError::from)?;
    let actor = state.roles.load_actor(user.0).await?;
    let resource_type = state
        .catalog
        .create_resource_type(&actor, body.organization_id, &body.name)
        .await?;
    Ok((StatusCode::CREATED, Json(resource_type)))
}

#[utoipa::path(
    post,
    path = "/api/v1/resources",
    tag = "catalog",
    request_body = CreateResourceRequest,
    responses(
        (status = 201, description = "Resource created", body = Resource),
        (status = 400, description = "Resource type belongs to another organization", body = ErrorResponse),
        (status = 403, description = "Not authorized", body = ErrorResponse),
        (status = 404, description = "Location or resource type not found", body = ErrorResponse)
    )
)]
pub async fn create_resource(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Json(body): Json<CreateResourceRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    body.validate().map_err(AppError::from)?;
    let actor = state.roles.load_actor(user.0).await?;
    let resource = state
        .catalog
        .create_resource(
            &actor,
            NewResource {
                location_id: body.location_id,
                resource_type_id: body.resource_type_id,
                name: body.name,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(resource)))
}

#[utoipa::path(
    patch,
    path = "/api/v1/resources/{id}",
    tag = "catalog",
    params(("id" = Uuid, Path, description = "Resource ID")),
    request_body = UpdateResourceRequest,
    responses(
        (status = 200, description = "Resource updated", body = Resource),
        (status = 403, description = "Not authorized", body = ErrorResponse),
        (status = 404, description = "Resource not found", body = ErrorResponse)
    )
)]
pub async fn update_resource(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateResourceRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    body.validate().map_err(AppError::from)?;
    let actor = state.roles.load_actor(user.0).await?;
    let resource = state
        .catalog
        .update_resource(
            &actor,
            id,
            ResourceUpdate {
                name: body.name,
                resource_type_id: body.resource_type_id,
                is_active: body.is_active,
            },
        )
        .await?;
    Ok(Json(resource))
}

#[utoipa::path(
    get,
    path = "/api/v1/resources/{id}",
    tag = "catalog",
    params(("id" = Uuid, Path, description = "Resource ID")),
    responses(
        (status = 200, description = "Resource found", body = Resource),
        (status = 404, description = "Resource not found", body = ErrorResponse)
    )
)]
pub async fn get_resource(
    State(state): State<Arc<AppState>>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let resource = state.catalog.get_resource(id).await?;
    Ok(Json(resource))
}
