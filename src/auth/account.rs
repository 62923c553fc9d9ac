//! Registration, login and password change.
//!
//! Callers resolve identities themselves (see [`super::resolve`]) and pass them
//! in explicitly; nothing here reads request state.

use super::{
    generate_salt, hash_password, require_admin, verify_password, AuthError, AuthState,
    MSG_USER_NOT_FOUND, MSG_WRONG_CREDENTIALS,
};
use crate::store::{NewUser, User, USERNAME_MAX_CHARS};
use tracing::{debug, info, instrument};

fn validate_username(username: &str) -> Result<(), AuthError> {
    if username.is_empty() {
        return Err(AuthError::BadRequest("username must not be empty"));
    }
    if username.chars().count() > USERNAME_MAX_CHARS {
        return Err(AuthError::BadRequest("username is too long"));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.is_empty() {
        return Err(AuthError::BadRequest("password must not be empty"));
    }
    Ok(())
}

async fn create_account(
    state: &AuthState,
    username: &str,
    password: &str,
    admin: bool,
) -> Result<User, AuthError> {
    validate_username(username)?;
    validate_password(password)?;

    let salt = generate_salt();
    let hash = hash_password(password, &salt);

    let user = state
        .store()
        .create_user_with_credential(
            NewUser {
                username: username.to_string(),
                admin,
            },
            &hash,
            &salt,
        )
        .await?;

    info!(user_id = user.id, admin, "User created");

    Ok(user)
}

/// Create a regular user. Only admins may register users.
///
/// # Errors
/// `Forbidden` for non-admin callers, `BadRequest` for invalid input,
/// `Conflict` when the username is taken.
#[instrument(skip(state, password), fields(caller = caller.id))]
pub async fn register(
    state: &AuthState,
    caller: &User,
    username: &str,
    password: &str,
) -> Result<User, AuthError> {
    require_admin(caller)?;
    create_account(state, username, password, false).await
}

/// Provision an admin account out-of-band (CLI only, never exposed over HTTP).
///
/// # Errors
/// Same as [`register`] without the caller check.
#[instrument(skip(state, password))]
pub async fn bootstrap_admin(
    state: &AuthState,
    username: &str,
    password: &str,
) -> Result<User, AuthError> {
    create_account(state, username, password, true).await
}

/// Check a username/password pair and mint a token for the owning user.
///
/// # Errors
/// `Unauthorized("Wrong username or password")` for both unknown usernames and
/// wrong passwords.
#[instrument(skip(state, password))]
pub async fn login(state: &AuthState, username: &str, password: &str) -> Result<String, AuthError> {
    let Some(credential) = state.store().get_credential_by_username(username).await? else {
        debug!("Login failed: unknown username");
        return Err(AuthError::Unauthorized(MSG_WRONG_CREDENTIALS));
    };

    if !verify_password(password, &credential.salt, &credential.hash) {
        debug!("Login failed: password mismatch");
        return Err(AuthError::Unauthorized(MSG_WRONG_CREDENTIALS));
    }

    let token = state.codec().encode(&credential.user_id.to_string())?;

    debug!(user_id = credential.user_id, "Login successful");

    Ok(token)
}

/// Replace the user's credential with a fresh salt and hash.
///
/// The old password is not re-verified; possession of a valid token is enough.
///
/// # Errors
/// `BadRequest` for an empty password, `Internal` on store failure.
#[instrument(skip(state, new_password), fields(user_id = user.id))]
pub async fn change_password(
    state: &AuthState,
    user: &User,
    new_password: &str,
) -> Result<(), AuthError> {
    validate_password(new_password)?;

    let salt = generate_salt();
    let hash = hash_password(new_password, &salt);

    state.store().update_credential(user.id, &hash, &salt).await?;

    info!("Password changed");

    Ok(())
}

/// # Errors
/// `Internal` on store failure.
pub async fn list_users(state: &AuthState) -> Result<Vec<User>, AuthError> {
    Ok(state.store().list_users().await?)
}

/// # Errors
/// `NotFound` when no user has this id.
pub async fn get_user(state: &AuthState, id: i32) -> Result<User, AuthError> {
    state
        .store()
        .get_user_by_id(id)
        .await?
        .ok_or(AuthError::NotFound(MSG_USER_NOT_FOUND))
}

/// # Errors
/// `Internal` on store failure.
pub async fn find_users(state: &AuthState, prefix: &str) -> Result<Vec<User>, AuthError> {
    Ok(state.store().find_users_by_username_prefix(prefix).await?)
}
