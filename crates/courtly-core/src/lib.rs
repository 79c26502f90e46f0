//! Courtly Core Library
//!
//! This crate provides the domain models, error types, configuration, and
//! validation shared across all Courtly components, plus the store traits
//! that seam the scheduling engine off the persistence layer.

pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use store::{BookingStore, CatalogStore, RoleFactsStore};
