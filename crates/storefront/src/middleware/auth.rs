//! Authentication extractors.
//!
//! Provides extractors for requiring a logged-in member in route handlers.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::SessionIdentity;
use crate::services::IdentitySession;

/// Extractor that requires a logged-in member.
///
/// If nobody is logged in (or the session idled out), the request is
/// rejected with 401.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireMember(member): RequireMember,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", member.username)
/// }
/// ```
pub struct RequireMember(pub SessionIdentity);

impl<S> FromRequestParts<S> for RequireMember
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        OptionalMember::from_request_parts(parts, state)
            .await?
            .0
            .map(Self)
            .ok_or_else(|| AppError::Unauthorized("Login required".to_string()))
    }
}

/// Extractor that optionally gets the logged-in member.
///
/// Unlike `RequireMember`, this does not reject anonymous requests.
pub struct OptionalMember(pub Option<SessionIdentity>);

impl<S> FromRequestParts<S> for OptionalMember
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by SessionManagerLayer
        let Some(session) = parts.extensions.get::<Session>() else {
            return Ok(Self(None));
        };
        Ok(Self(session.identity().await?))
    }
}
