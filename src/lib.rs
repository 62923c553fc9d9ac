//! # Tessera (minimal identity service)
//!
//! `tessera` stores users and their credentials, authenticates users by
//! username and password, issues signed bearer tokens and authorizes requests
//! against those tokens.
//!
//! ## Credentials
//!
//! Passwords are never stored. Each credential keeps a random 16 character
//! alphanumeric salt and the lowercase hex SHA-256 digest of `password || salt`.
//! Password changes always replace both values together.
//!
//! ## Tokens
//!
//! Login returns an HS256 JWT whose only identity claim is `sub` (the user id).
//! Tokens are presented as `Authorization: Bearer <token>` and are never stored
//! server side.
//!
//! ## Authorization
//!
//! Every protected route resolves the caller explicitly through
//! [`auth::resolve`]. Admin-only routes then pass [`auth::require_admin`].
//! Login failures never reveal whether the username exists.

pub mod api;
pub mod auth;
pub mod cli;
pub mod store;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
