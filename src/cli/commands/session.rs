use anyhow::{Context, Result};
use clap::{
    Arg, ArgAction, ArgMatches, Command,
    builder::{PossibleValuesParser, RangedU64ValueParser},
};
use std::time::Duration;
use url::Url;

pub const ARG_SESSION_STORE: &str = "session-store";
pub const ARG_REDIS_URL: &str = "redis-url";
pub const ARG_REDIS_POOL_SIZE: &str = "redis-pool-size";
pub const ARG_STORE_TIMEOUT_MS: &str = "store-timeout-ms";
pub const ARG_SESSION_COOKIE_HTTP_ONLY: &str = "session-cookie-http-only";
pub const ARG_SESSION_COOKIE_SECURE: &str = "session-cookie-secure";

/// Where session bindings live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    Memory,
    Redis { url: String, pool_size: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub backend: Backend,
    pub store_timeout: Duration,
    pub cookie_http_only: bool,
    pub cookie_secure: bool,
}

impl Options {
    /// Parse session arguments from matches.
    ///
    /// # Errors
    /// Returns an error if the Redis backend is selected without a URL.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let backend = match matches
            .get_one::<String>(ARG_SESSION_STORE)
            .map(String::as_str)
        {
            Some("redis") => {
                let url = matches
                    .get_one::<String>(ARG_REDIS_URL)
                    .cloned()
                    .filter(|v| !v.trim().is_empty())
                    .with_context(|| format!("missing required argument: --{ARG_REDIS_URL}"))?;
                let parsed = Url::parse(&url).context("Invalid Redis URL")?;
                if !matches!(parsed.scheme(), "redis" | "rediss") {
                    anyhow::bail!("Redis URL must use redis:// or rediss://");
                }
                let pool_size = matches
                    .get_one::<usize>(ARG_REDIS_POOL_SIZE)
                    .copied()
                    .unwrap_or(16);
                Backend::Redis { url, pool_size }
            }
            _ => Backend::Memory,
        };

        let timeout_ms = matches
            .get_one::<u64>(ARG_STORE_TIMEOUT_MS)
            .copied()
            .unwrap_or(3000);

        Ok(Self {
            backend,
            store_timeout: Duration::from_millis(timeout_ms),
            cookie_http_only: matches.get_flag(ARG_SESSION_COOKIE_HTTP_ONLY),
            cookie_secure: matches.get_flag(ARG_SESSION_COOKIE_SECURE),
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    let command = command
        .arg(
            Arg::new(ARG_SESSION_STORE)
                .long(ARG_SESSION_STORE)
                .help("Session store backend")
                .env("XSSDEMO_SESSION_STORE")
                .default_value("memory")
                .value_parser(PossibleValuesParser::new(["memory", "redis"])),
        )
        .arg(
            Arg::new(ARG_REDIS_URL)
                .long(ARG_REDIS_URL)
                .help("Redis URL, e.g. redis://localhost:6379/0")
                .env("XSSDEMO_REDIS_URL")
                .required_if_eq(ARG_SESSION_STORE, "redis"),
        )
        .arg(
            Arg::new(ARG_REDIS_POOL_SIZE)
                .long(ARG_REDIS_POOL_SIZE)
                .help("Maximum pooled Redis connections")
                .env("XSSDEMO_REDIS_POOL_SIZE")
                .default_value("16")
                .value_parser(RangedU64ValueParser::<usize>::new().range(1..)),
        )
        .arg(
            Arg::new(ARG_STORE_TIMEOUT_MS)
                .long(ARG_STORE_TIMEOUT_MS)
                .help("Deadline in milliseconds for every store call made by a request")
                .env("XSSDEMO_STORE_TIMEOUT_MS")
                .default_value("3000")
                .value_parser(clap::value_parser!(u64).range(1..)),
        );

    command
        .arg(
            Arg::new(ARG_SESSION_COOKIE_HTTP_ONLY)
                .long(ARG_SESSION_COOKIE_HTTP_ONLY)
                .help("Mark the session cookie HttpOnly")
                .env("XSSDEMO_SESSION_COOKIE_HTTP_ONLY")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new(ARG_SESSION_COOKIE_SECURE)
                .long(ARG_SESSION_COOKIE_SECURE)
                .help("Mark the session cookie Secure")
                .env("XSSDEMO_SESSION_COOKIE_SECURE")
                .action(ArgAction::SetTrue),
        )
}
