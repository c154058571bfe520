//! Session middleware.

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
};

use common::{AppError, AppResult};
use domain::{messages, BEARER_TOKEN_PREFIX};

use crate::extractors::CurrentUser;
use crate::state::AppState;

/// Resolve the bearer token, when present, into a [`CurrentUser`].
///
/// Requests without an `Authorization` header pass through anonymously and
/// the handler decides whether that is acceptable. A header that is present
/// but invalid is refused outright.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(token) = extract_token(&request)? {
        let actor = state.services.auth().authenticate(&token).await?;
        request.extensions_mut().insert(CurrentUser(actor));
    }

    Ok(next.run(request).await)
}

/// Extract bearer token from Authorization header.
fn extract_token(request: &Request<Body>) -> AppResult<Option<String>> {
    let Some(header) = request.headers().get(AUTHORIZATION) else {
        return Ok(None);
    };

    let token = header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix(BEARER_TOKEN_PREFIX))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::unauthorized(messages::LOGIN_REQUIRED))?;

    Ok(Some(token.to_string()))
}
