use crate::{
    api::{
        self,
        db::PgStore,
        handlers::auth::{
            AuthConfig, AuthState, MasterCredentials, MemorySessionStore, RedisSessionStore,
            SessionStore,
        },
    },
    cli::commands::session::Backend,
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::{sync::Arc, time::Duration};
use tracing::{info, warn};

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub session_backend: Backend,
    pub store_timeout: Duration,
    pub session_cookie_http_only: bool,
    pub session_cookie_secure: bool,
    pub basic_auth_id: String,
    pub basic_auth_password: SecretString,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the database or session store cannot be set up, or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let database = PgStore::connect(
        &args.dsn,
        args.db_min_connections,
        args.db_max_connections,
    )
    .await?;
    info!(
        max_connections = args.db_max_connections,
        min_connections = args.db_min_connections,
        "Connected to database"
    );

    let sessions = session_store(&args.session_backend)?;
    if let Err(err) = sessions.ping().await {
        // The pool reconnects on demand; /health reports the store until it answers.
        warn!("Session store not reachable yet: {err}");
    }

    let config = AuthConfig::new()
        .with_session_cookie_http_only(args.session_cookie_http_only)
        .with_session_cookie_secure(args.session_cookie_secure)
        .with_store_timeout(args.store_timeout);
    let master = MasterCredentials::new(args.basic_auth_id, args.basic_auth_password);
    let auth_state = Arc::new(AuthState::new(config, sessions, master));

    api::new(args.port, auth_state, database).await
}

fn session_store(backend: &Backend) -> Result<Arc<dyn SessionStore>> {
    match backend {
        Backend::Memory => {
            info!("Using in-memory session store");
            Ok(Arc::new(MemorySessionStore::new()))
        }
        Backend::Redis { url, pool_size } => {
            let store = RedisSessionStore::connect(url, *pool_size)
                .context("Failed to set up Redis session store")?;
            info!(pool_size, "Using Redis session store");
            Ok(Arc::new(store))
        }
    }
}
