//! Domain models shared across Courtly components.

pub mod actor;
pub mod booking;
pub mod location;
pub mod organization;
pub mod query;
pub mod resource;
pub mod user;

pub use actor::Actor;
pub use booking::{Booking, BookingStatus, NewBooking};
pub use location::{Location, LocationManager};
pub use organization::{Organization, OrganizationManager, OrganizationMembership};
pub use query::{BookingFilter, Page, Visibility};
pub use resource::{NewResource, Resource, ResourcePath, ResourceType, ResourceUpdate};
pub use user::User;
