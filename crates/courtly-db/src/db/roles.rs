//! Role-facts repository.
//!
//! Loads the identity relationships the access resolver needs: system-admin
//! flag, owned organizations, organization-manager rows, location-manager
//! rows, and plain memberships. Loaded per request by design - caching role
//! facts across requests would resurrect permissions a membership change
//! already revoked.

use async_trait::async_trait;
use courtly_core::models::Actor;
use courtly_core::{AppError, RoleFactsStore};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use super::map_db_err;

#[derive(Clone)]
pub struct RoleFactsRepository {
    pool: PgPool,
}

impl RoleFactsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleFactsStore for RoleFactsRepository {
    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "select"))]
    async fn load_actor(&self, user_id: Uuid) -> Result<Actor, AppError> {
        let admin = sqlx::query_scalar::<Postgres, bool>(
            "SELECT is_system_admin FROM users WHERE id = $1 AND is_active",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)?;

        let is_system_admin = match admin {
            Some(flag) => flag,
            None => {
                return Err(AppError::NotFound(format!(
                    "user {} not found or inactive",
                    user_id
                )))
            }
        };

        let owned_org_ids =
            sqlx::query_scalar::<Postgres, Uuid>("SELECT id FROM organizations WHERE owner_id = $1")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await
                .map_err(map_db_err)?;

        let manager_of_org_ids = sqlx::query_scalar::<Postgres, Uuid>(
            "SELECT organization_id FROM organization_managers WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err)?;

        let manager_of_location_ids = sqlx::query_scalar::<Postgres, Uuid>(
            "SELECT location_id FROM location_managers WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err)?;

        let member_of_org_ids = sqlx::query_scalar::<Postgres, Uuid>(
            "SELECT organization_id FROM organization_memberships WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err)?;

        Ok(Actor {
            user_id,
            is_system_admin,
            owned_org_ids: owned_org_ids.into_iter().collect(),
            manager_of_org_ids: manager_of_org_ids.into_iter().collect(),
            manager_of_location_ids: manager_of_location_ids.into_iter().collect(),
            member_of_org_ids: member_of_org_ids.into_iter().collect(),
        })
    }
}
