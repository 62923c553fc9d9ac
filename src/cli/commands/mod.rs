pub mod admin;
pub mod logging;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ColorChoice, Command,
};

pub const ARG_PORT: &str = "port";
pub const ARG_DATABASE_URL: &str = "database-url";
pub const ARG_JWT_SECRET: &str = "jwt-secret";
pub const ARG_TOKEN_TTL: &str = "token-ttl";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("tessera")
        .about("Minimal identity service")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("TESSERA_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_DATABASE_URL)
                .short('d')
                .long("database-url")
                .help("Postgres connection string")
                .long_help(
                    "Postgres connection string. Required; may be given before or after the subcommand.",
                )
                .env("TESSERA_DATABASE_URL")
                .hide_env_values(true)
                .global(true),
        )
        .arg(
            Arg::new(ARG_JWT_SECRET)
                .long("jwt-secret")
                .help("HMAC secret used to sign and verify tokens")
                .long_help(
                    "HMAC secret used to sign and verify tokens. Required; may be given before or after the subcommand.",
                )
                .env("TESSERA_JWT_SECRET")
                .hide_env_values(true)
                .global(true),
        )
        .arg(
            Arg::new(ARG_TOKEN_TTL)
                .long("token-ttl")
                .help("Token lifetime in seconds, 0 disables expiry")
                .default_value("86400")
                .env("TESSERA_TOKEN_TTL")
                .value_parser(clap::value_parser!(u64)),
        );

    let command = admin::with_args(command);
    logging::with_args(command)
}
