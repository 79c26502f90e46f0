//! Hierarchical access-control resolver.
//!
//! A pure decision table over precomputed role facts. Resolution order,
//! first match wins, no partial credit:
//!
//! 1. system admin - everything
//! 2. organization owner of the target's organization - all organization-
//!    and location-scoped actions
//! 3. organization manager of the target's organization - all
//!    location-scoped actions
//! 4. location manager of the target's specific location - booking-status
//!    management and resource edits at that location only
//! 5. any authenticated user - creating bookings, and reading/cancelling
//!    bookings they authored
//! 6. deny
//!
//! The resolver never reaches outside the declared hierarchy: a location
//! manager of one location gains nothing at a sibling location, even inside
//! the same organization.

use uuid::Uuid;

use courtly_core::models::{Actor, ResourcePath};
use courtly_core::AppError;

/// The actions this core authorizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Read a booking.
    Read,
    /// Create a resource or resource type.
    CreateResource,
    /// Edit an existing resource.
    UpdateResource,
    /// Confirm or cancel someone else's booking.
    ManageBookingStatus,
    /// Cancel a booking the actor authored.
    CancelOwnBooking,
    /// Book a resource.
    CreateBooking,
}

/// The place in the hierarchy an action is aimed at, resolved before the
/// call. `location_id` is `None` for organization-scoped targets (e.g.
/// resource types), which keeps the location-manager arm from ever matching
/// them. `booking_owner_id` is set when the target is a specific booking.
#[derive(Debug, Clone)]
pub struct AccessTarget {
    pub organization_id: Uuid,
    pub location_id: Option<Uuid>,
    pub booking_owner_id: Option<Uuid>,
}

impl AccessTarget {
    pub fn organization(organization_id: Uuid) -> Self {
        Self {
            organization_id,
            location_id: None,
            booking_owner_id: None,
        }
    }

    pub fn from_path(path: &ResourcePath) -> Self {
        Self {
            organization_id: path.organization.id,
            location_id: Some(path.location.id),
            booking_owner_id: None,
        }
    }

    pub fn with_booking_owner(mut self, owner_id: Uuid) -> Self {
        self.booking_owner_id = Some(owner_id);
        self
    }
}

/// Pure authorization function; works exclusively off the actor's role
/// facts, so the caller decides how fresh those facts are (always: one load
/// per request).
pub struct AccessResolver;

impl AccessResolver {
    pub fn authorize(actor: &Actor, action: Action, target: &AccessTarget) -> Result<(), AppError> {
        // (1) System admin.
        if actor.is_system_admin {
            return Ok(());
        }

        // (2) Organization owner.
        if actor.owned_org_ids.contains(&target.organization_id) {
            return Ok(());
        }

        // (3) Organization manager: every location-scoped action within the
        // organization. Organization-identity changes (ownership transfer)
        // are not actions of this core, so nothing else is carved out.
        if actor.manager_of_org_ids.contains(&target.organization_id) {
            return Ok(());
        }

        // (4) Location manager, scoped strictly to the target location.
        if let Some(location_id) = target.location_id {
            if actor.manager_of_location_ids.contains(&location_id) {
                match action {
                    Action::Read
                    | Action::CreateResource
                    | Action::UpdateResource
                    | Action::ManageBookingStatus
                    | Action::CreateBooking => return Ok(()),
                    // Ownership of the booking decides this one, below.
                    Action::CancelOwnBooking => {}
                }
            }
        }

        // (5) Any authenticated user.
        match action {
            Action::CreateBooking => return Ok(()),
            Action::Read | Action::CancelOwnBooking
                if target.booking_owner_id == Some(actor.user_id) =>
            {
                return Ok(())
            }
            _ => {}
        }

        // (6) Deny. The detail stays in the logs; clients get a generic
        // message via ErrorMetadata.
        Err(AppError::Forbidden(format!(
            "user {} may not {:?} on organization {} (location {:?})",
            actor.user_id, action, target.organization_id, target.location_id
        )))
    }
}
