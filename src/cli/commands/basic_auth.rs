use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;

pub const ARG_BASIC_AUTH_ID: &str = "basic-auth-id";
pub const ARG_BASIC_AUTH_PASSWORD: &str = "basic-auth-password";

#[derive(Debug, Clone)]
pub struct Options {
    pub id: String,
    pub password: SecretString,
}

impl Options {
    /// Parse the master credential from matches.
    ///
    /// # Errors
    /// Returns an error if either part is missing or blank.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let get_non_empty = |id: &str| {
            matches
                .get_one::<String>(id)
                .cloned()
                .filter(|v| !v.trim().is_empty())
        };

        let id = get_non_empty(ARG_BASIC_AUTH_ID)
            .with_context(|| format!("missing required argument: --{ARG_BASIC_AUTH_ID}"))?;
        let password = get_non_empty(ARG_BASIC_AUTH_PASSWORD)
            .with_context(|| format!("missing required argument: --{ARG_BASIC_AUTH_PASSWORD}"))?;

        Ok(Self {
            id,
            password: SecretString::from(password),
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_BASIC_AUTH_ID)
                .long(ARG_BASIC_AUTH_ID)
                .help("Master id accepted by the basic-auth gate")
                .env("XSSDEMO_BASIC_AUTH_ID")
                .required(true),
        )
        .arg(
            Arg::new(ARG_BASIC_AUTH_PASSWORD)
                .long(ARG_BASIC_AUTH_PASSWORD)
                .help("Master password accepted by the basic-auth gate")
                .env("XSSDEMO_BASIC_AUTH_PASSWORD")
                .hide_env_values(true)
                .required(true),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::test_env;
    use secrecy::ExposeSecret;

    fn command() -> Command {
        with_args(Command::new("test"))
    }

    #[test]
    fn credential_comes_from_env() -> Result<()> {
        test_env::with_vars(
            &[
                ("XSSDEMO_BASIC_AUTH_ID", "admin"),
                ("XSSDEMO_BASIC_AUTH_PASSWORD", "s3cret"),
            ],
            || {
                let matches = command().try_get_matches_from(vec!["test"])?;
                let options = Options::parse(&matches)?;
                assert_eq!(options.id, "admin");
                assert_eq!(options.password.expose_secret(), "s3cret");
                Ok(())
            },
        )
    }

    #[test]
    fn blank_password_is_rejected() -> Result<()> {
        test_env::with_vars(&[], || {
            let matches = command().try_get_matches_from(vec![
                "test",
                "--basic-auth-id",
                "admin",
                "--basic-auth-password",
                "  ",
            ])?;
            let result = Options::parse(&matches);
            assert!(result.is_err());
            if let Err(err) = result {
                assert!(err.to_string().contains("--basic-auth-password"));
            }
            Ok(())
        })
    }

    #[test]
    fn password_is_not_printed_in_debug() -> Result<()> {
        test_env::with_vars(&[], || {
            let matches = command().try_get_matches_from(vec![
                "test",
                "--basic-auth-id",
                "admin",
                "--basic-auth-password",
                "s3cret",
            ])?;
            let options = Options::parse(&matches)?;
            assert!(!format!("{options:?}").contains("s3cret"));
            Ok(())
        })
    }
}
