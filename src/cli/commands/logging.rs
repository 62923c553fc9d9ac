use clap::{builder::ValueParser, Arg, Command};

pub const ARG_VERBOSITY: &str = "verbosity";

#[must_use]
pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_VERBOSITY)
            .short('v')
            .long("verbose")
            .help("Log verbosity, repeat -v or name a level (default: ERROR, INFO for create-admin)")
            .env("TESSERA_LOG_LEVEL")
            .global(true)
            .action(clap::ArgAction::Count)
            .value_parser(validator_log_level()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Option<u8>, clap::Error> {
        let command = with_args(Command::new("tessera"));
        temp_env::with_vars_unset(["TESSERA_LOG_LEVEL"], || {
            command
                .try_get_matches_from(args)
                .map(|matches| matches.get_one::<u8>(ARG_VERBOSITY).copied())
        })
    }

    #[test]
    fn test_repeated_flag_counts() {
        assert_eq!(parse(&["tessera"]).ok().flatten(), Some(0));
        assert_eq!(parse(&["tessera", "-vvv"]).ok().flatten(), Some(3));
    }

    #[test]
    fn test_named_and_numeric_levels_from_env() {
        for (value, expected) in [("DEBUG", 3), ("warn", 1), ("5", 5)] {
            temp_env::with_var("TESSERA_LOG_LEVEL", Some(value), || {
                let matches = with_args(Command::new("tessera")).get_matches_from(["tessera"]);
                assert_eq!(matches.get_one::<u8>(ARG_VERBOSITY).copied(), Some(expected));
            });
        }
    }

    #[test]
    fn test_unknown_level_is_rejected() {
        for value in ["loud", "6"] {
            temp_env::with_var("TESSERA_LOG_LEVEL", Some(value), || {
                let result = with_args(Command::new("tessera")).try_get_matches_from(["tessera"]);
                assert!(result.is_err(), "{value} should be rejected");
            });
        }
    }
}
