//! Authentication and authorization core.
//!
//! Flow Overview:
//! - `hasher`: salted SHA-256 credential digests.
//! - `token`: HS256 bearer tokens carrying the user id.
//! - `resolver`: bearer token -> [`crate::store::User`].
//! - `guard`: admin-only enforcement.
//! - `account`: register, login and password change.

pub mod account;
mod error;
mod guard;
mod hasher;
mod resolver;
mod token;

pub use error::{
    AuthError, MSG_INVALID_TOKEN, MSG_NOT_ADMIN, MSG_NO_TOKEN, MSG_USER_EXISTS,
    MSG_USER_NOT_FOUND, MSG_WRONG_CREDENTIALS,
};
pub use guard::require_admin;
pub use hasher::{generate_salt, hash_password, verify_password, SALT_LEN};
pub use resolver::{bearer_token, resolve, resolve_token};
pub use token::{Claims, TokenCodec};

use crate::store::Store;
use std::sync::Arc;

/// Shared, immutable state for every request: the store and the token codec.
#[derive(Clone)]
pub struct AuthState {
    store: Arc<dyn Store>,
    codec: TokenCodec,
}

impl std::fmt::Debug for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthState")
            .field("codec", &self.codec)
            .finish_non_exhaustive()
    }
}

impl AuthState {
    #[must_use]
    pub fn new(store: Arc<dyn Store>, codec: TokenCodec) -> Self {
        Self { store, codec }
    }

    #[must_use]
    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    #[must_use]
    pub const fn codec(&self) -> &TokenCodec {
        &self.codec
    }
}
