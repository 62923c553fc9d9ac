//! Turns a request's bearer token into a verified [`User`].
//!
//! Flow Overview:
//! 1) Read `Authorization: Bearer <token>`.
//! 2) Verify the token and parse its numeric subject.
//! 3) Load the user by primary key (exactly one store lookup, no caching).
//!
//! Every failure is a 401. The short message differs per cause so it can be
//! logged, but none of them leak anything beyond "not authenticated".

use super::{AuthError, AuthState, MSG_INVALID_TOKEN, MSG_NO_TOKEN, MSG_USER_NOT_FOUND};
use crate::store::User;
use axum::http::{header::AUTHORIZATION, HeaderMap};
use tracing::debug;

/// Extract the token from an `Authorization: Bearer` header.
#[must_use]
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Resolve the caller of a request.
///
/// # Errors
/// Returns [`AuthError::Unauthorized`] when the token is missing or invalid, or
/// when its subject no longer exists; store failures surface as [`AuthError::Internal`].
pub async fn resolve(headers: &HeaderMap, state: &AuthState) -> Result<User, AuthError> {
    let Some(token) = bearer_token(headers) else {
        debug!("No bearer token provided");
        return Err(AuthError::Unauthorized(MSG_NO_TOKEN));
    };

    resolve_token(token, state).await
}

/// Resolve an already-extracted bearer token.
///
/// # Errors
/// Same as [`resolve`], minus the missing-token case.
pub async fn resolve_token(token: &str, state: &AuthState) -> Result<User, AuthError> {
    let subject = state
        .codec()
        .decode(token)
        .map_err(|_| AuthError::Unauthorized(MSG_INVALID_TOKEN))?;

    let user_id: i32 = subject.parse().map_err(|_| {
        debug!("Token subject is not a user id: {subject}");
        AuthError::Unauthorized(MSG_INVALID_TOKEN)
    })?;

    match state.store().get_user_by_id(user_id).await? {
        Some(user) => Ok(user),
        None => {
            debug!("Token subject {user_id} does not exist");
            Err(AuthError::Unauthorized(MSG_USER_NOT_FOUND))
        }
    }
}
