//! Map parsed arguments to an action.

use crate::cli::actions::{Action, server::Args};
use crate::cli::commands::{ARG_DSN, ARG_PORT, basic_auth, database, session};
use anyhow::{Context, Result};

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(6060);
    let dsn = matches
        .get_one::<String>(ARG_DSN)
        .cloned()
        .context("missing required argument: --dsn")?;

    let database_opts = database::Options::parse(matches)?;
    let session_opts = session::Options::parse(matches)?;
    let basic_auth_opts = basic_auth::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        dsn,
        db_max_connections: database_opts.max_connections,
        db_min_connections: database_opts.min_connections,
        session_backend: session_opts.backend,
        store_timeout: session_opts.store_timeout,
        session_cookie_http_only: session_opts.cookie_http_only,
        session_cookie_secure: session_opts.cookie_secure,
        basic_auth_id: basic_auth_opts.id,
        basic_auth_password: basic_auth_opts.password,
    }))
}
