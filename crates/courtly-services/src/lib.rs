//! Courtly service layer: the scheduling engine.
//!
//! `access` is the hierarchical access-control resolver, `scheduler` is the
//! booking orchestration over the store traits, and `catalog` covers the
//! authorized management of resource types and resources.

pub mod access;
pub mod catalog;
pub mod scheduler;

pub use access::{AccessResolver, AccessTarget, Action};
pub use catalog::CatalogService;
pub use scheduler::BookingScheduler;
