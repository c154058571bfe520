//! Authenticated actor extractor.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use common::AppError;
use domain::{messages, Actor};

/// Actor resolved by the session middleware from the bearer token.
///
/// Rejects with 401 when the request carried no token. Use
/// `Option<CurrentUser>` on routes that anonymous visitors may call.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Actor);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| AppError::unauthorized(messages::LOGIN_REQUIRED))
    }
}
