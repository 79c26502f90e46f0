//! Database repositories for the data access layer
//!
//! Each repository owns one slice of the schema: `catalog` for the ownership
//! hierarchy (organizations, locations, resource types, resources), `booking`
//! for the interval-booking table, and `roles` for per-request role facts.
//! All of them map sqlx errors through `map_db_err` so the application error
//! taxonomy (Conflict / Unavailable / InvalidArgument) survives the storage
//! boundary.

pub mod booking;
pub mod catalog;
pub mod roles;
pub mod transaction;

pub use booking::BookingRepository;
pub use catalog::CatalogRepository;
pub use roles::RoleFactsRepository;

use courtly_core::AppError;

/// Postgres SQLSTATE codes this layer cares about.
mod pg_code {
    /// exclusion_violation - the bookings_no_overlap constraint fired.
    pub const EXCLUSION_VIOLATION: &str = "23P01";
    /// unique_violation
    pub const UNIQUE_VIOLATION: &str = "23505";
    /// foreign_key_violation
    pub const FOREIGN_KEY_VIOLATION: &str = "23503";
    /// check_violation - e.g. bookings_valid_interval.
    pub const CHECK_VIOLATION: &str = "23514";
    /// query_canceled - statement timeout.
    pub const QUERY_CANCELED: &str = "57014";
}

/// Map a sqlx error onto the application taxonomy.
///
/// Exclusion violations become `Conflict` (the storage-level guarantee
/// rejecting an overlapping insert), timeouts and connection failures become
/// the retryable `Unavailable`, constraint violations on caller-supplied
/// references become `InvalidArgument`, and everything else stays a
/// `Database` error.
pub(crate) fn map_db_err(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &err {
        match db.code().as_deref() {
            Some(pg_code::EXCLUSION_VIOLATION) => {
                return AppError::Conflict(
                    "interval overlaps an existing booking on this resource".to_string(),
                )
            }
            Some(pg_code::UNIQUE_VIOLATION) => {
                return AppError::Conflict("a row with the same identity already exists".to_string())
            }
            Some(pg_code::FOREIGN_KEY_VIOLATION) => {
                return AppError::InvalidArgument(
                    "referenced row does not exist in this organization".to_string(),
                )
            }
            Some(pg_code::CHECK_VIOLATION) => {
                return AppError::InvalidArgument("row violates a schema constraint".to_string())
            }
            Some(pg_code::QUERY_CANCELED) => {
                return AppError::Unavailable("database query timed out".to_string())
            }
            _ => {}
        }
    }
    match err {
        sqlx::Error::PoolTimedOut => {
            AppError::Unavailable("database connection pool timed out".to_string())
        }
        sqlx::Error::Io(e) => AppError::Unavailable(format!("database connection failed: {}", e)),
        other => AppError::Database(other),
    }
}
