use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{Location, Organization};

/// Resource type: a classification label within one organization
/// (e.g. "badminton court").
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ResourceType {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The bookable unit: one court/room at one location, classified by one
/// resource type of the same organization. `organization_id` is carried on
/// the row so composite foreign keys can pin both the location and the
/// resource type to the same tenant.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Resource {
    pub id: Uuid,
    pub location_id: Uuid,
    pub organization_id: Uuid,
    pub resource_type_id: Uuid,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Parameters for creating a resource.
#[derive(Debug, Clone)]
pub struct NewResource {
    pub location_id: Uuid,
    pub resource_type_id: Uuid,
    pub name: String,
}

/// Partial update for a resource. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ResourceUpdate {
    pub name: Option<String>,
    pub resource_type_id: Option<Uuid>,
    pub is_active: Option<bool>,
}

/// A resource resolved to its place in the ownership hierarchy. Every
/// authorization decision and every venue-gating check works off this path
/// rather than re-querying the chain piecemeal.
#[derive(Debug, Clone)]
pub struct ResourcePath {
    pub resource: Resource,
    pub location: Location,
    pub organization: Organization,
}
