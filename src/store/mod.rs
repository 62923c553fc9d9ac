//! Persistence port for users and credentials.
//!
//! The auth core only talks to [`Store`]. `postgres` is the production adapter,
//! `memory` backs tests and local experiments.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Maximum username length, in characters.
pub const USERNAME_MAX_CHARS: usize = 16;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub admin: bool,
}

/// Secret material bound to one user. Never serialized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credential {
    pub user_id: i32,
    pub hash: String,
    pub salt: String,
}

#[derive(Clone, Debug)]
pub struct NewUser {
    pub username: String,
    pub admin: bool,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated: {0}")]
    Conflict(String),
    #[error("store backend error: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if is_unique_violation(&err) {
            Self::Conflict(err.to_string())
        } else {
            Self::Backend(err.to_string())
        }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code == "23505"),
        _ => false,
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Create a user and its credential as one atomic unit.
    ///
    /// Fails with [`StoreError::Conflict`] when the username is taken; in that
    /// case neither row exists afterwards.
    async fn create_user_with_credential(
        &self,
        user: NewUser,
        hash: &str,
        salt: &str,
    ) -> Result<User, StoreError>;

    async fn get_user_by_id(&self, id: i32) -> Result<Option<User>, StoreError>;

    /// Credential joined through its owning user.
    async fn get_credential_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Credential>, StoreError>;

    /// Replace hash and salt together.
    async fn update_credential(&self, user_id: i32, hash: &str, salt: &str)
        -> Result<(), StoreError>;

    async fn list_users(&self) -> Result<Vec<User>, StoreError>;

    async fn find_users_by_username_prefix(&self, prefix: &str) -> Result<Vec<User>, StoreError>;
}
