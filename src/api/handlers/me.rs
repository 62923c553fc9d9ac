//! Authenticated self-service endpoints.

use crate::{
    auth::{account, resolve, AuthError, AuthState},
    store::User,
};
use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Deserialize;
use std::{fmt, sync::Arc};
use tracing::instrument;
use utoipa::ToSchema;

#[derive(ToSchema, Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(alias = "newPassword")]
    pub new_password: String,
}

impl fmt::Debug for ChangePasswordRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangePasswordRequest")
            .finish_non_exhaustive()
    }
}

#[utoipa::path(
    get,
    path= "/users/me",
    responses (
        (status = 200, description = "The authenticated user", body = User),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearer" = [])),
    tag= "me"
)]
pub async fn get_me(
    headers: HeaderMap,
    state: Extension<Arc<AuthState>>,
) -> Result<Json<User>, AuthError> {
    Ok(Json(resolve(&headers, &state).await?))
}

#[utoipa::path(
    patch,
    path= "/users/password",
    request_body = ChangePasswordRequest,
    responses (
        (status = 204, description = "Password changed"),
        (status = 400, description = "Empty password"),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearer" = [])),
    tag= "me"
)]
#[instrument(skip_all)]
pub async fn change_password(
    headers: HeaderMap,
    state: Extension<Arc<AuthState>>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<StatusCode, AuthError> {
    let user = resolve(&headers, &state).await?;
    account::change_password(&state, &user, &payload.new_password).await?;

    Ok(StatusCode::NO_CONTENT)
}
