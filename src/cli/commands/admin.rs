use clap::{Arg, Command};

pub const CMD_CREATE_ADMIN: &str = "create-admin";
pub const ARG_ADMIN_USERNAME: &str = "username";
pub const ARG_ADMIN_PASSWORD: &str = "password";

/// `create-admin` provisions the first administrator; there is no HTTP route for it.
#[must_use]
pub fn with_args(command: Command) -> Command {
    command.subcommand(
        Command::new(CMD_CREATE_ADMIN)
            .about("Create an administrator account and exit")
            .arg(
                Arg::new(ARG_ADMIN_USERNAME)
                    .short('u')
                    .long("username")
                    .help("Administrator username (at most 16 characters)")
                    .env("TESSERA_ADMIN_USERNAME")
                    .required(true),
            )
            .arg(
                Arg::new(ARG_ADMIN_PASSWORD)
                    .long("password")
                    .help("Administrator password")
                    .env("TESSERA_ADMIN_PASSWORD")
                    .hide_env_values(true)
                    .required(true),
            ),
    )
}
