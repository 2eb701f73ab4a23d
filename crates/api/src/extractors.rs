//! Request extractors.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use scribe_common::{AppError, AppResult};
use scribe_db::entities::user;
use serde::Deserialize;

/// Optional authenticated user extractor.
///
/// Yields whatever the auth middleware resolved; handlers that need a
/// signed-in caller pass this through [`require_user`] so anonymous
/// requests bounce to the login flow instead of a bare 401.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<user::Model>);

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<user::Model>().cloned()))
    }
}

/// Gate a handler on authentication.
///
/// Unauthenticated callers get an [`AppError::AuthRequired`], which the
/// response layer turns into a redirect to the login flow with the
/// original target preserved in `next`.
pub fn require_user(maybe: MaybeAuthUser, next: &str) -> AppResult<user::Model> {
    maybe.0.ok_or_else(|| AppError::AuthRequired {
        next: next.to_string(),
    })
}

/// `page` query parameter on feed endpoints.
///
/// Kept as a raw string so a non-numeric value degrades to page 1
/// instead of a 400, matching paginator behavior.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// Raw 1-based page number.
    pub page: Option<String>,
}

impl PageQuery {
    /// The requested page; missing or unparsable values default to 1.
    #[must_use]
    pub fn number(&self) -> u64 {
        self.page
            .as_deref()
            .and_then(|p| p.parse().ok())
            .unwrap_or(1)
    }
}
