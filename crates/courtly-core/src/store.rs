//! Store traits seaming the scheduling engine off the persistence layer.
//!
//! The engine holds no in-process locks and no shared mutable state;
//! conflict-freedom is delegated to whatever implements `BookingStore`. The
//! Postgres implementation lives in `courtly-db`; tests drive the scheduler
//! with in-memory doubles that honor the same contracts.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{
    Actor, Booking, BookingFilter, BookingStatus, Location, NewBooking, NewResource, Organization,
    Page, Resource, ResourcePath, ResourceType, ResourceUpdate, Visibility,
};

/// Read access to the ownership hierarchy (organizations, locations,
/// resources) plus the writes the catalog service needs.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn get_organization(&self, id: Uuid) -> Result<Option<Organization>, AppError>;

    async fn get_location(&self, id: Uuid) -> Result<Option<Location>, AppError>;

    async fn get_resource(&self, id: Uuid) -> Result<Option<Resource>, AppError>;

    async fn get_resource_type(&self, id: Uuid) -> Result<Option<ResourceType>, AppError>;

    /// Resolve a resource to its location and organization in one round trip.
    async fn resolve_resource_path(&self, resource_id: Uuid)
        -> Result<Option<ResourcePath>, AppError>;

    async fn create_resource_type(
        &self,
        organization_id: Uuid,
        name: &str,
    ) -> Result<ResourceType, AppError>;

    async fn create_resource(&self, new: NewResource) -> Result<Resource, AppError>;

    async fn update_resource(
        &self,
        id: Uuid,
        update: ResourceUpdate,
    ) -> Result<Option<Resource>, AppError>;
}

/// Booking persistence. Implementations must guarantee the exclusion
/// contract: for concurrent `create_pending` calls with overlapping
/// intervals on one resource, at most one commits; the rest fail `Conflict`.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Atomically check availability and insert a `pending` booking.
    /// Fails with `Conflict` when the interval overlaps a non-cancelled
    /// booking on the same resource, leaving no row behind.
    async fn create_pending(&self, new: NewBooking) -> Result<Booking, AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<Booking>, AppError>;

    /// Half-open interval overlap probe against non-cancelled bookings.
    /// `exclude_booking_id` skips one booking, for update-style revalidation.
    async fn has_conflict(
        &self,
        resource_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude_booking_id: Option<Uuid>,
    ) -> Result<bool, AppError>;

    /// Compare-and-set status transition under a row lock. Fails `NotFound`
    /// when the booking does not exist and `InvalidTransition` when its
    /// current status is not in `from`. Bumps `updated_at`.
    async fn transition(
        &self,
        id: Uuid,
        from: &[BookingStatus],
        to: BookingStatus,
    ) -> Result<Booking, AppError>;

    /// Filtered, paginated listing trimmed to the given visibility.
    async fn list(
        &self,
        filter: &BookingFilter,
        visibility: &Visibility,
    ) -> Result<Page<Booking>, AppError>;
}

/// Per-request load of a user's role facts. Never cached across requests.
#[async_trait]
pub trait RoleFactsStore: Send + Sync {
    /// Fails `NotFound` for unknown or deactivated users.
    async fn load_actor(&self, user_id: Uuid) -> Result<Actor, AppError>;
}
