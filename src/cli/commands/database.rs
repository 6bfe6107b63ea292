use anyhow::Result;
use clap::{Arg, ArgMatches, Command};

pub const ARG_DB_MAX_CONNECTIONS: &str = "db-max-connections";
pub const ARG_DB_MIN_CONNECTIONS: &str = "db-min-connections";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub max_connections: u32,
    pub min_connections: u32,
}

impl Options {
    /// Parse pool sizing from matches.
    ///
    /// # Errors
    /// Returns an error if the idle floor exceeds the open ceiling.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let max_connections = matches
            .get_one::<u32>(ARG_DB_MAX_CONNECTIONS)
            .copied()
            .unwrap_or(256);
        let min_connections = matches
            .get_one::<u32>(ARG_DB_MIN_CONNECTIONS)
            .copied()
            .unwrap_or(1);
        if min_connections > max_connections {
            anyhow::bail!(
                "--{ARG_DB_MIN_CONNECTIONS} ({min_connections}) must not exceed --{ARG_DB_MAX_CONNECTIONS} ({max_connections})"
            );
        }
        Ok(Self {
            max_connections,
            min_connections,
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_DB_MAX_CONNECTIONS)
                .long(ARG_DB_MAX_CONNECTIONS)
                .help("Maximum open database connections")
                .env("XSSDEMO_DB_MAX_CONNECTIONS")
                .default_value("256")
                .value_parser(clap::value_parser!(u32).range(1..)),
        )
        .arg(
            Arg::new(ARG_DB_MIN_CONNECTIONS)
                .long(ARG_DB_MIN_CONNECTIONS)
                .help("Idle database connections kept open")
                .env("XSSDEMO_DB_MIN_CONNECTIONS")
                .default_value("1")
                .value_parser(clap::value_parser!(u32)),
        )
}
