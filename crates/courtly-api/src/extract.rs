//! Authenticated-user extraction.
//!
//! Authentication (token issuance, password hashing) is an upstream concern;
//! by the time a request reaches this service a gateway has verified the
//! caller and stamped their id into `X-User-Id`. Handlers turn that id into
//! fresh role facts via `RoleFactsStore` on every request.

use axum::{extract::FromRequestParts, http::request::Parts};
use courtly_core::AppError;
use uuid::Uuid;

use crate::error::HttpAppError;

pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated caller's user id, parsed from `X-User-Id`.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser(pub Uuid);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                HttpAppError(AppError::Forbidden("missing X-User-Id header".to_string()))
            })?;
        let user_id = Uuid::parse_str(raw).map_err(|_| {
            HttpAppError(AppError::InvalidArgument(
                "X-User-Id must be a UUID".to_string(),
            ))
        })?;
        Ok(AuthenticatedUser(user_id))
    }
}
