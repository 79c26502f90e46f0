//! Catalog service: authorized management of resource types and resources.
//!
//! Reads on the hierarchy are open to any authenticated user (you cannot
//! book what you cannot see); every write goes through the access resolver
//! first.

use std::sync::Arc;

use uuid::Uuid;

use courtly_core::models::{
    Actor, Location, NewResource, Organization, Resource, ResourcePath, ResourceType,
    ResourceUpdate,
};
use courtly_core::{AppError, CatalogStore};

use crate::access::{AccessResolver, AccessTarget, Action};

#[derive(Clone)]
pub struct CatalogService {
    catalog: Arc<dyn CatalogStore>,
}

impl CatalogService {
    pub fn new(catalog: Arc<dyn CatalogStore>) -> Self {
        Self { catalog }
    }

    pub async fn get_organization(&self, id: Uuid) -> Result<Organization, AppError> {
        self.catalog
            .get_organization(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("organization {} not found", id)))
    }

    pub async fn get_location(&self, id: Uuid) -> Result<Location, AppError> {
        self.catalog
            .get_location(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("location {} not found", id)))
    }

    pub async fn get_resource(&self, id: Uuid) -> Result<Resource, AppError> {
        self.catalog
            .get_resource(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("resource {} not found", id)))
    }

    /// Create a resource type. Organization-scoped: owner, organization
    /// manager, or system admin; location managers hold no org-wide rights.
    #[tracing::instrument(skip(self, actor), fields(user_id = %actor.user_id))]
    pub async fn create_resource_type(
        &self,
        actor: &Actor,
        organization_id: Uuid,
        name: &str,
    ) -> Result<ResourceType, AppError> {
        if name.trim().is_empty() {
            return Err(AppError::InvalidArgument(
                "resource type name must not be empty".to_string(),
            ));
        }
        // Existence first, so unknown organizations read as NotFound rather
        // than Forbidden.
        self.get_organization(organization_id).await?;
        AccessResolver::authorize(
            actor,
            Action::CreateResource,
            &AccessTarget::organization(organization_id),
        )?;
        self.catalog.create_resource_type(organization_id, name.trim()).await
    }

    /// Create a resource at a location. Allowed for the location's managers
    /// and everyone above them in the hierarchy.
    #[tracing::instrument(skip(self, actor, new), fields(user_id = %actor.user_id))]
    pub async fn create_resource(&self, actor: &Actor, new: NewResource) -> Result<Resource, AppError> {
        if new.name.trim().is_empty() {
            return Err(AppError::InvalidArgument(
                "resource name must not be empty".to_string(),
            ));
        }
        let location = self.get_location(new.location_id).await?;
        let resource_type = self
            .catalog
            .get_resource_type(new.resource_type_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("resource type {} not found", new.resource_type_id))
            })?;
        if resource_type.organization_id != location.organization_id {
            return Err(AppError::InvalidArgument(
                "resource type belongs to a different organization".to_string(),
            ));
        }

        AccessResolver::authorize(
            actor,
            Action::CreateResource,
            &AccessTarget {
                organization_id: location.organization_id,
                location_id: Some(location.id),
                booking_owner_id: None,
            },
        )?;
        self.catalog.create_resource(new).await
    }

    /// Edit a resource in place; `None` fields stay untouched.
    #[tracing::instrument(skip(self, actor, update), fields(user_id = %actor.user_id))]
    pub async fn update_resource(
        &self,
        actor: &Actor,
        resource_id: Uuid,
        update: ResourceUpdate,
    ) -> Result<Resource, AppError> {
        let path = self.resolve_path(resource_id).await?;

        AccessResolver::authorize(actor, Action::UpdateResource, &AccessTarget::from_path(&path))?;

        if let Some(new_type) = update.resource_type_id {
            let resource_type = self
                .catalog
                .get_resource_type(new_type)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("resource type {} not found", new_type)))?;
            if resource_type.organization_id != path.organization.id {
                return Err(AppError::InvalidArgument(
                    "resource type belongs to a different organization".to_string(),
                ));
            }
        }

        self.catalog
            .update_resource(resource_id, update)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("resource {} not found", resource_id)))
    }

    pub async fn resolve_path(&self, resource_id: Uuid) -> Result<ResourcePath, AppError> {
        self.catalog
            .resolve_resource_path(resource_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("resource {} not found", resource_id)))
    }
}
