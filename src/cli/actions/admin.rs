use crate::{
    auth::{account, AuthState, TokenCodec},
    cli::config::Config,
    store::PgStore,
};
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub config: Config,
    pub username: String,
    pub password: SecretString,
}

/// Create an administrator directly in the database.
/// # Errors
/// Returns an error if the database is unreachable, the input is invalid or the
/// username is taken.
pub async fn execute(args: Args) -> Result<()> {
    let store = PgStore::connect(args.config.database_url()).await?;
    let codec = TokenCodec::new(args.config.jwt_secret(), args.config.token_ttl());
    let state = AuthState::new(Arc::new(store), codec);

    let user = account::bootstrap_admin(&state, &args.username, args.password.expose_secret())
        .await
        .with_context(|| format!("Failed to create admin {}", args.username))?;

    info!(user_id = user.id, "Admin {} created", user.username);

    Ok(())
}
