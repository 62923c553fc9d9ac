use crate::store::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub const MSG_NO_TOKEN: &str = "no token provided";
pub const MSG_INVALID_TOKEN: &str = "invalid token";
pub const MSG_USER_NOT_FOUND: &str = "user not found";
pub const MSG_WRONG_CREDENTIALS: &str = "Wrong username or password";
pub const MSG_NOT_ADMIN: &str = "not admin";
pub const MSG_USER_EXISTS: &str = "user already exists";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("unauthorized: {0}")]
    Unauthorized(&'static str),
    #[error("forbidden: {0}")]
    Forbidden(&'static str),
    #[error("conflict: {0}")]
    Conflict(&'static str),
    #[error("not found: {0}")]
    NotFound(&'static str),
    #[error("bad request: {0}")]
    BadRequest(&'static str),
    /// Token failed verification. The resolver maps this to `Unauthorized`.
    #[error("invalid token")]
    InvalidToken,
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) | Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to return to the caller.
    #[must_use]
    pub const fn public_message(&self) -> &'static str {
        match self {
            Self::Unauthorized(msg)
            | Self::Forbidden(msg)
            | Self::Conflict(msg)
            | Self::NotFound(msg)
            | Self::BadRequest(msg) => msg,
            Self::InvalidToken => MSG_INVALID_TOKEN,
            Self::Internal(_) => "internal server error",
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(_) => Self::Conflict(MSG_USER_EXISTS),
            StoreError::Backend(detail) => Self::Internal(detail),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if let Self::Internal(detail) = &self {
            error!("Internal error: {detail}");
        }

        (self.status(), Json(json!({ "error": self.public_message() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use axum::body::to_bytes;

    #[test]
    fn status_mapping() {
        assert_eq!(
            AuthError::Unauthorized(MSG_NO_TOKEN).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AuthError::InvalidToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AuthError::Forbidden(MSG_NOT_ADMIN).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AuthError::Conflict(MSG_USER_EXISTS).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AuthError::NotFound(MSG_USER_NOT_FOUND).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AuthError::Internal("boom".to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn store_errors_map_to_conflict_or_internal() {
        let conflict: AuthError = StoreError::Conflict("dup".to_string()).into();
        assert!(matches!(conflict, AuthError::Conflict(MSG_USER_EXISTS)));

        let backend: AuthError = StoreError::Backend("down".to_string()).into();
        assert!(matches!(backend, AuthError::Internal(detail) if detail == "down"));
    }

    #[tokio::test]
    async fn internal_details_are_not_exposed() -> Result<()> {
        let response = AuthError::Internal("password=hunter2".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body(), usize::MAX).await?;
        let body_text = String::from_utf8(body.to_vec())?;
        assert!(!body_text.contains("hunter2"));
        assert!(body_text.contains("internal server error"));
        Ok(())
    }

    #[tokio::test]
    async fn body_carries_public_message() -> Result<()> {
        let response = AuthError::Unauthorized(MSG_WRONG_CREDENTIALS).into_response();
        let body = to_bytes(response.into_body(), usize::MAX).await?;
        let value: serde_json::Value = serde_json::from_slice(&body)?;
        assert_eq!(value["error"], MSG_WRONG_CREDENTIALS);
        Ok(())
    }
}
