//! Caller identity extractor for routes behind `jwt_auth_middleware`.

use crate::auth::JwtClaims;
use crate::errors::AppError;
use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

/// The authenticated user's id, taken from the `sub` claim.
///
/// Rejects with 401 when the route is not behind the auth middleware or the
/// subject is not a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerId(pub Uuid);

impl<S> FromRequestParts<S> for CallerId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = parts
            .extensions
            .get::<JwtClaims>()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        Uuid::parse_str(&claims.sub)
            .map(CallerId)
            .map_err(|_| AppError::Unauthorized("Invalid token subject".to_string()))
    }
}
