//! User management endpoints.
//!
//! Registration resolves the caller from the bearer token and requires the
//! admin role. Listing, lookup by id and prefix search are public reads.

use crate::{
    auth::{account, resolve, AuthError, AuthState},
    store::User,
};
use axum::{
    extract::{Extension, Path, Query},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::{fmt, sync::Arc};
use tracing::instrument;
use utoipa::{IntoParams, ToSchema};

#[derive(ToSchema, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Username prefix (case-sensitive).
    pub username: String,
}

#[utoipa::path(
    put,
    path= "/users",
    request_body = RegisterRequest,
    responses (
        (status = 201, description = "User created", body = User, content_type = "application/json"),
        (status = 400, description = "Invalid username or password"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller is not an admin"),
        (status = 409, description = "Username already exists"),
    ),
    security(("bearer" = [])),
    tag= "users"
)]
#[instrument(skip(headers, state))]
pub async fn register(
    headers: HeaderMap,
    state: Extension<Arc<AuthState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AuthError> {
    let caller = resolve(&headers, &state).await?;
    let user = account::register(&state, &caller, &payload.username, &payload.password).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    get,
    path= "/users",
    responses (
        (status = 200, description = "All users", body = [User]),
    ),
    tag= "users"
)]
pub async fn list_users(state: Extension<Arc<AuthState>>) -> Result<Json<Vec<User>>, AuthError> {
    Ok(Json(account::list_users(&state).await?))
}

#[utoipa::path(
    get,
    path= "/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    responses (
        (status = 200, description = "User detail", body = User),
        (status = 404, description = "User not found"),
    ),
    tag= "users"
)]
pub async fn get_user(
    Path(id): Path<i32>,
    state: Extension<Arc<AuthState>>,
) -> Result<Json<User>, AuthError> {
    Ok(Json(account::get_user(&state, id).await?))
}

#[utoipa::path(
    get,
    path= "/users/find",
    params(SearchQuery),
    responses (
        (status = 200, description = "Users whose username starts with the prefix", body = [User]),
    ),
    tag= "users"
)]
pub async fn find_users(
    Query(query): Query<SearchQuery>,
    state: Extension<Arc<AuthState>>,
) -> Result<Json<Vec<User>>, AuthError> {
    Ok(Json(account::find_users(&state, &query.username).await?))
}
