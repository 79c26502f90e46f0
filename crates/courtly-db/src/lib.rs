//! Courtly database layer: Postgres repositories implementing the store
//! traits from `courtly-core`.

pub mod db;

pub use db::{BookingRepository, CatalogRepository, RoleFactsRepository};
