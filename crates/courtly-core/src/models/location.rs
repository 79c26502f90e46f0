use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Location entity: a physical venue containing resources, owned by exactly
/// one organization. Operating hours are a daily time-of-day window;
/// `open_time == close_time` means open around the clock.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Location {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub open_time: NaiveTime,
    pub close_time: NaiveTime,
    pub is_open: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Location-manager row. Carries the organization id so the schema can
/// require both a membership for (organization, user) and that the location
/// belongs to the same organization - a manager can never be assigned across
/// tenants.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct LocationManager {
    pub location_id: Uuid,
    pub organization_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}
