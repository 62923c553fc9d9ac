use crate::cli::{
    actions::{admin, server, Action},
    commands::{self, admin as admin_cmd},
    config::Config,
};
use anyhow::{Context, Result};
use secrecy::SecretString;

/// # Errors
/// Returns an error if required arguments are missing or invalid.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let config = config(matches)?;

    match matches.subcommand() {
        Some((admin_cmd::CMD_CREATE_ADMIN, sub)) => {
            let username = sub
                .get_one::<String>(admin_cmd::ARG_ADMIN_USERNAME)
                .cloned()
                .context("missing required argument: --username")?;
            let password = sub
                .get_one::<String>(admin_cmd::ARG_ADMIN_PASSWORD)
                .cloned()
                .map(SecretString::from)
                .context("missing required argument: --password")?;

            Ok(Action::CreateAdmin(admin::Args {
                config,
                username,
                password,
            }))
        }
        _ => Ok(Action::Server(server::Args { config })),
    }
}

fn config(matches: &clap::ArgMatches) -> Result<Config> {
    let port = matches
        .get_one::<u16>(commands::ARG_PORT)
        .copied()
        .unwrap_or(8080);
    let database_url = matches
        .get_one::<String>(commands::ARG_DATABASE_URL)
        .context("missing required argument: --database-url")?;
    let jwt_secret = matches
        .get_one::<String>(commands::ARG_JWT_SECRET)
        .cloned()
        .map(SecretString::from)
        .context("missing required argument: --jwt-secret")?;
    let token_ttl = matches
        .get_one::<u64>(commands::ARG_TOKEN_TTL)
        .copied()
        .unwrap_or(86400);

    Config::new(port, database_url, jwt_secret, token_ttl)
}
