use clap::{Arg, ArgAction, ArgMatches, Command, builder::ValueParser};

pub const ARG_VERBOSITY: &str = "verbosity";
pub const ARG_LOG_LEVEL: &str = "log-level";

/// Parse a level name or number onto the same scale as the `-v` count.
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

/// Verbosity to log at: an explicit `--log-level` wins over the `-v` count.
#[must_use]
pub fn verbosity(matches: &ArgMatches) -> u8 {
    matches
        .get_one::<u8>(ARG_LOG_LEVEL)
        .copied()
        .or_else(|| matches.get_one::<u8>(ARG_VERBOSITY).copied())
        .unwrap_or(0)
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_VERBOSITY)
                .short('v')
                .long("verbose")
                .help("Verbosity level: -v WARN, -vv INFO, -vvv DEBUG, -vvvv TRACE (default: ERROR)")
                .global(true)
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new(ARG_LOG_LEVEL)
                .long(ARG_LOG_LEVEL)
                .help("Log level: error, warn, info, debug, trace or 0-5")
                .env("XSSDEMO_LOG_LEVEL")
                .global(true)
                .value_parser(validator_log_level()),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::test_env;

    fn command() -> Command {
        with_args(Command::new("test"))
    }

    #[test]
    fn log_level_accepts_names_and_numbers() {
        for (raw, expected) in [("warn", 1u8), ("DEBUG", 3), ("5", 5)] {
            let matches = test_env::with_vars(&[("XSSDEMO_LOG_LEVEL", raw)], || {
                command().try_get_matches_from(vec!["test"])
            });
            assert_eq!(
                matches.ok().map(|m| verbosity(&m)),
                Some(expected),
                "level {raw}"
            );
        }
    }

    #[test]
    fn log_level_rejects_unknown_names() {
        let result = test_env::with_vars(&[("XSSDEMO_LOG_LEVEL", "loud")], || {
            command().try_get_matches_from(vec!["test"])
        });
        assert!(result.is_err());
    }

    #[test]
    fn verbosity_falls_back_to_count() {
        let matches =
            test_env::with_vars(&[], || command().try_get_matches_from(vec!["test", "-vv"]));
        assert_eq!(matches.ok().map(|m| verbosity(&m)), Some(2));

        let matches = test_env::with_vars(&[], || command().try_get_matches_from(vec!["test"]));
        assert_eq!(matches.ok().map(|m| verbosity(&m)), Some(0));
    }

    #[test]
    fn explicit_log_level_flag() {
        let matches = test_env::with_vars(&[], || {
            command().try_get_matches_from(vec!["test", "--log-level", "trace"])
        });
        assert_eq!(matches.ok().map(|m| verbosity(&m)), Some(4));
    }
}
