use crate::cli::{
    actions::Action,
    commands::{self, admin::CMD_CREATE_ADMIN},
    dispatch, telemetry,
};
use anyhow::Result;

/// Map verbosity count to tracing level
const fn get_verbosity_level(verbosity: u8) -> Option<tracing::Level> {
    match verbosity {
        0 => None,
        1 => Some(tracing::Level::WARN),
        2 => Some(tracing::Level::INFO),
        3 => Some(tracing::Level::DEBUG),
        _ => Some(tracing::Level::TRACE),
    }
}

/// `create-admin` is a one-shot command whose outcome is only reported
/// through the log, so it defaults to INFO instead of ERROR.
fn verbosity_for(matches: &clap::ArgMatches) -> Option<tracing::Level> {
    let count = matches
        .get_one::<u8>(commands::logging::ARG_VERBOSITY)
        .copied()
        .unwrap_or(0);

    match (count, matches.subcommand_name()) {
        (0, Some(CMD_CREATE_ADMIN)) => Some(tracing::Level::INFO),
        (count, _) => get_verbosity_level(count),
    }
}

/// Parse arguments, install logging, and return the action to run.
///
/// # Errors
///
/// Returns an error if argument parsing, telemetry initialization, or action dispatch fails
pub fn start() -> Result<Action> {
    let matches = commands::new().get_matches();

    let verbosity_level = verbosity_for(&matches);

    telemetry::init(verbosity_level)?;

    dispatch::handler(&matches)
}
