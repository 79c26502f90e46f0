//! Catalog repository: the ownership hierarchy.
//!
//! Organizations, locations, resource types, and resources. The hierarchy is
//! a tree held together with explicit foreign keys; `resolve_resource_path`
//! walks resource -> location -> organization in one query because every
//! authorization decision needs the whole chain.

use async_trait::async_trait;
use chrono::{DateTime, NaiveTime, Utc};
use courtly_core::models::{
    Location, NewResource, Organization, Resource, ResourcePath, ResourceType, ResourceUpdate,
};
use courtly_core::{AppError, CatalogStore};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use super::map_db_err;

/// Flat row for the three-way hierarchy join; columns are aliased to avoid
/// the id/name/timestamp collisions between the joined tables.
#[derive(sqlx::FromRow)]
struct PathRow {
    resource_id: Uuid,
    location_id: Uuid,
    organization_id: Uuid,
    resource_type_id: Uuid,
    resource_name: String,
    resource_is_active: bool,
    resource_created_at: DateTime<Utc>,
    resource_updated_at: DateTime<Utc>,
    location_name: String,
    open_time: NaiveTime,
    close_time: NaiveTime,
    is_open: bool,
    location_created_at: DateTime<Utc>,
    location_updated_at: DateTime<Utc>,
    owner_id: Uuid,
    organization_name: String,
    organization_is_active: bool,
    organization_created_at: DateTime<Utc>,
    organization_updated_at: DateTime<Utc>,
}

impl PathRow {
    fn into_path(self) -> ResourcePath {
        ResourcePath {
            resource: Resource {
                id: self.resource_id,
                location_id: self.location_id,
                organization_id: self.organization_id,
                resource_type_id: self.resource_type_id,
                name: self.resource_name,
                is_active: self.resource_is_active,
                created_at: self.resource_created_at,
                updated_at: self.resource_updated_at,
            },
            location: Location {
                id: self.location_id,
                organization_id: self.organization_id,
                name: self.location_name,
                open_time: self.open_time,
                close_time: self.close_time,
                is_open: self.is_open,
                created_at: self.location_created_at,
                updated_at: self.location_updated_at,
            },
            organization: Organization {
                id: self.organization_id,
                owner_id: self.owner_id,
                name: self.organization_name,
                is_active: self.organization_is_active,
                created_at: self.organization_created_at,
                updated_at: self.organization_updated_at,
            },
        }
    }
}

#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for CatalogRepository {
    #[tracing::instrument(skip(self), fields(db.table = "organizations", db.operation = "select"))]
    async fn get_organization(&self, id: Uuid) -> Result<Option<Organization>, AppError> {
        sqlx::query_as::<Postgres, Organization>(
            r#"
            SELECT id, owner_id, name, is_active, created_at, updated_at
            FROM organizations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)
    }

    #[tracing::instrument(skip(self), fields(db.table = "locations", db.operation = "select"))]
    async fn get_location(&self, id: Uuid) -> Result<Option<Location>, AppError> {
        sqlx::query_as::<Postgres, Location>(
            r#"
            SELECT id, organization_id, name, open_time, close_time, is_open,
                   created_at, updated_at
            FROM locations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)
    }

    #[tracing::instrument(skip(self), fields(db.table = "resources", db.operation = "select"))]
    async fn get_resource(&self, id: Uuid) -> Result<Option<Resource>, AppError> {
        sqlx::query_as::<Postgres, Resource>(
            r#"
            SELECT id, location_id, organization_id, resource_type_id, name,
                   is_active, created_at, updated_at
            FROM resources
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)
    }

    #[tracing::instrument(
        skip(self),
        fields(db.table = "resource_types", db.operation = "select")
    )]
    async fn get_resource_type(&self, id: Uuid) -> Result<Option<ResourceType>, AppError> {
        sqlx::query_as::<Postgres, ResourceType>(
            r#"
            SELECT id, organization_id, name, created_at, updated_at
            FROM resource_types
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)
    }

    #[tracing::instrument(skip(self), fields(db.table = "resources", db.operation = "select"))]
    async fn resolve_resource_path(
        &self,
        resource_id: Uuid,
    ) -> Result<Option<ResourcePath>, AppError> {
        let row = sqlx::query_as::<Postgres, PathRow>(
            r#"
            SELECT
                r.id AS resource_id,
                r.location_id,
                r.organization_id,
                r.resource_type_id,
                r.name AS resource_name,
                r.is_active AS resource_is_active,
                r.created_at AS resource_created_at,
                r.updated_at AS resource_updated_at,
                l.name AS location_name,
                l.open_time,
                l.close_time,
                l.is_open,
                l.created_at AS location_created_at,
                l.updated_at AS location_updated_at,
                o.owner_id,
                o.name AS organization_name,
                o.is_active AS organization_is_active,
                o.created_at AS organization_created_at,
                o.updated_at AS organization_updated_at
            FROM resources r
            JOIN locations l ON l.id = r.location_id
            JOIN organizations o ON o.id = r.organization_id
            WHERE r.id = $1
            "#,
        )
        .bind(resource_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)?;

        Ok(row.map(PathRow::into_path))
    }

    #[tracing::instrument(
        skip(self),
        fields(db.table = "resource_types", db.operation = "insert")
    )]
    async fn create_resource_type(
        &self,
        organization_id: Uuid,
        name: &str,
    ) -> Result<ResourceType, AppError> {
        sqlx::query_as::<Postgres, ResourceType>(
            r#"
            INSERT INTO resource_types (id, organization_id, name, created_at, updated_at)
            VALUES ($1, $2, $3, now(), now())
            RETURNING id, organization_id, name, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(organization_id)
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_err)
    }

    #[tracing::instrument(skip(self, new), fields(db.table = "resources", db.operation = "insert"))]
    async fn create_resource(&self, new: NewResource) -> Result<Resource, AppError> {
        // The INSERT ... SELECT pins organization_id to the location's owner;
        // the composite FK then rejects a resource type from another tenant.
        let resource = sqlx::query_as::<Postgres, Resource>(
            r#"
            INSERT INTO resources (
                id, location_id, organization_id, resource_type_id, name,
                is_active, created_at, updated_at
            )
            SELECT $1, l.id, l.organization_id, $3, $4, TRUE, now(), now()
            FROM locations l
            WHERE l.id = $2
            RETURNING id, location_id, organization_id, resource_type_id, name,
                      is_active, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.location_id)
        .bind(new.resource_type_id)
        .bind(&new.name)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)?;

        resource.ok_or_else(|| AppError::NotFound(format!("location {} not found", new.location_id)))
    }

    #[tracing::instrument(
        skip(self, update),
        fields(db.table = "resources", db.operation = "update")
    )]
    async fn update_resource(
        &self,
        id: Uuid,
        update: ResourceUpdate,
    ) -> Result<Option<Resource>, AppError> {
        sqlx::query_as::<Postgres, Resource>(
            r#"
            UPDATE resources
            SET name = COALESCE($2, name),
                resource_type_id = COALESCE($3, resource_type_id),
                is_active = COALESCE($4, is_active),
                updated_at = now()
            WHERE id = $1
            RETURNING id, location_id, organization_id, resource_type_id, name,
                      is_active, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(update.name)
        .bind(update.resource_type_id)
        .bind(update.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)
    }
}
