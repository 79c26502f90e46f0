//! Booking scheduler.
//!
//! Orchestrates creation, confirmation, cancellation, and listing. The
//! scheduler itself holds no locks and no shared mutable state; atomicity of
//! check-and-insert and of status transitions is the `BookingStore`'s
//! contract. Nothing here retries: a `Conflict` is final for the requested
//! interval, and `Unavailable` is the caller's cue to back off and retry.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use courtly_core::models::{
    Actor, Booking, BookingFilter, BookingStatus, NewBooking, Page, ResourcePath, Visibility,
};
use courtly_core::validation::{validate_interval, within_operating_hours};
use courtly_core::{AppError, BookingStore, CatalogStore};

use crate::access::{AccessResolver, AccessTarget, Action};

#[derive(Clone)]
pub struct BookingScheduler {
    catalog: Arc<dyn CatalogStore>,
    bookings: Arc<dyn BookingStore>,
}

impl BookingScheduler {
    pub fn new(catalog: Arc<dyn CatalogStore>, bookings: Arc<dyn BookingStore>) -> Self {
        Self { catalog, bookings }
    }

    /// Create a booking in `pending` for the actor.
    ///
    /// Validates the interval shape, gates on the venue (active organization,
    /// open location, operating hours, active resource), authorizes, and
    /// finally hands the atomic check-and-insert to the store. On conflict
    /// nothing is persisted.
    #[tracing::instrument(skip(self, actor), fields(user_id = %actor.user_id))]
    pub async fn create_booking(
        &self,
        actor: &Actor,
        resource_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Booking, AppError> {
        validate_interval(start, end)?;

        let path = self.resolve_path(resource_id).await?;
        if !path.organization.is_active {
            return Err(AppError::InvalidArgument(
                "organization is not active".to_string(),
            ));
        }
        if !path.location.is_open {
            return Err(AppError::InvalidArgument("location is closed".to_string()));
        }
        if !path.resource.is_active {
            return Err(AppError::InvalidArgument("resource is not active".to_string()));
        }
        if !within_operating_hours(path.location.open_time, path.location.close_time, start, end) {
            return Err(AppError::InvalidArgument(
                "requested interval is outside the location's operating hours".to_string(),
            ));
        }

        AccessResolver::authorize(actor, Action::CreateBooking, &AccessTarget::from_path(&path))?;

        let booking = self
            .bookings
            .create_pending(NewBooking {
                resource_id,
                user_id: actor.user_id,
                start_time: start,
                end_time: end,
            })
            .await?;

        tracing::info!(booking_id = %booking.id, resource_id = %resource_id, "booking created");
        Ok(booking)
    }

    /// Confirm a pending booking. Requires booking-status management rights
    /// on the booking's location.
    #[tracing::instrument(skip(self, actor), fields(user_id = %actor.user_id))]
    pub async fn confirm_booking(&self, actor: &Actor, booking_id: Uuid) -> Result<Booking, AppError> {
        let booking = self.load_booking(booking_id).await?;
        let path = self.resolve_path(booking.resource_id).await?;

        AccessResolver::authorize(
            actor,
            Action::ManageBookingStatus,
            &AccessTarget::from_path(&path),
        )?;

        if !booking.status.can_transition_to(BookingStatus::Confirmed) {
            return Err(AppError::InvalidTransition {
                from: booking.status,
                to: BookingStatus::Confirmed,
            });
        }

        self.bookings
            .transition(booking_id, &[BookingStatus::Pending], BookingStatus::Confirmed)
            .await
    }

    /// Cancel a booking, from `pending` or `confirmed`. Allowed for the
    /// booking's owner and for anyone with booking-status management rights
    /// on its location.
    #[tracing::instrument(skip(self, actor), fields(user_id = %actor.user_id))]
    pub async fn cancel_booking(&self, actor: &Actor, booking_id: Uuid) -> Result<Booking, AppError> {
        let booking = self.load_booking(booking_id).await?;
        let path = self.resolve_path(booking.resource_id).await?;

        let target = AccessTarget::from_path(&path).with_booking_owner(booking.user_id);
        if booking.user_id == actor.user_id {
            AccessResolver::authorize(actor, Action::CancelOwnBooking, &target)?;
        } else {
            AccessResolver::authorize(actor, Action::ManageBookingStatus, &target)?;
        }

        if !booking.status.can_transition_to(BookingStatus::Cancelled) {
            return Err(AppError::InvalidTransition {
                from: booking.status,
                to: BookingStatus::Cancelled,
            });
        }

        self.bookings
            .transition(
                booking_id,
                &[BookingStatus::Pending, BookingStatus::Confirmed],
                BookingStatus::Cancelled,
            )
            .await
    }

    /// Fetch one booking, applying the same visibility rule as listing:
    /// bookings the actor may not see are reported as not found.
    pub async fn get_booking(&self, actor: &Actor, booking_id: Uuid) -> Result<Booking, AppError> {
        let booking = self.load_booking(booking_id).await?;
        let path = self.resolve_path(booking.resource_id).await?;

        let target = AccessTarget::from_path(&path).with_booking_owner(booking.user_id);
        if AccessResolver::authorize(actor, Action::Read, &target).is_err() {
            return Err(AppError::NotFound(format!("booking {} not found", booking_id)));
        }
        Ok(booking)
    }

    /// List bookings matching the filter, trimmed to what the actor may see:
    /// their own bookings, everything under organizations they own or
    /// manage and locations they manage, or everything for system admins.
    pub async fn list_bookings(
        &self,
        actor: &Actor,
        filter: &BookingFilter,
    ) -> Result<Page<Booking>, AppError> {
        let visibility = Visibility::for_actor(actor);
        self.bookings.list(filter, &visibility).await
    }

    async fn load_booking(&self, booking_id: Uuid) -> Result<Booking, AppError> {
        self.bookings
            .get(booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("booking {} not found", booking_id)))
    }

    async fn resolve_path(&self, resource_id: Uuid) -> Result<ResourcePath, AppError> {
        self.catalog
            .resolve_resource_path(resource_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("resource {} not found", resource_id)))
    }
}
