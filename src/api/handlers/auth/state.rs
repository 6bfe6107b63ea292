//! Auth state and configuration shared by the gates and the login flow.

use anyhow::anyhow;
use secrecy::{ExposeSecret, SecretString};
use std::{future::Future, sync::Arc, time::Duration};
use tokio::time::timeout;

use super::store::{SessionError, SessionStore};

const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Clone, Debug)]
pub struct AuthConfig {
    session_cookie_http_only: bool,
    session_cookie_secure: bool,
    store_timeout: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            session_cookie_http_only: false,
            session_cookie_secure: false,
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_session_cookie_http_only(mut self, http_only: bool) -> Self {
        self.session_cookie_http_only = http_only;
        self
    }

    #[must_use]
    pub fn with_session_cookie_secure(mut self, secure: bool) -> Self {
        self.session_cookie_secure = secure;
        self
    }

    #[must_use]
    pub fn with_store_timeout(mut self, store_timeout: Duration) -> Self {
        self.store_timeout = store_timeout;
        self
    }

    pub(crate) fn session_cookie_http_only(&self) -> bool {
        self.session_cookie_http_only
    }

    pub(crate) fn session_cookie_secure(&self) -> bool {
        self.session_cookie_secure
    }

    #[must_use]
    pub fn store_timeout(&self) -> Duration {
        self.store_timeout
    }
}

/// Fixed master credential checked by the basic-auth gate.
#[derive(Clone, Debug)]
pub struct MasterCredentials {
    id: String,
    password: SecretString,
}

impl MasterCredentials {
    #[must_use]
    pub fn new(id: String, password: SecretString) -> Self {
        Self { id, password }
    }

    pub(crate) fn matches(&self, id: &str, password: &str) -> bool {
        self.id == id && self.password.expose_secret() == password
    }
}

pub struct AuthState {
    config: AuthConfig,
    sessions: Arc<dyn SessionStore>,
    master: MasterCredentials,
}

impl AuthState {
    #[must_use]
    pub fn new(
        config: AuthConfig,
        sessions: Arc<dyn SessionStore>,
        master: MasterCredentials,
    ) -> Self {
        Self {
            config,
            sessions,
            master,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub fn sessions(&self) -> &dyn SessionStore {
        self.sessions.as_ref()
    }

    pub(crate) fn master(&self) -> &MasterCredentials {
        &self.master
    }

    /// Resolve a token, treating an expired deadline as a store failure.
    pub(crate) async fn resolve_session(&self, token: &str) -> Result<i64, SessionError> {
        self.within_deadline(self.sessions.resolve(token)).await
    }

    /// Mint a session for `user_id`, treating an expired deadline as a store failure.
    pub(crate) async fn create_session(&self, user_id: i64) -> Result<String, SessionError> {
        self.within_deadline(self.sessions.create(user_id)).await
    }

    pub(crate) async fn session_count(&self) -> Result<usize, SessionError> {
        self.within_deadline(self.sessions.len()).await
    }

    pub(crate) async fn ping_sessions(&self) -> Result<(), SessionError> {
        self.within_deadline(self.sessions.ping()).await
    }

    async fn within_deadline<T>(
        &self,
        operation: impl Future<Output = Result<T, SessionError>>,
    ) -> Result<T, SessionError> {
        timeout(self.config.store_timeout, operation)
            .await
            .map_err(|_| {
                SessionError::Store(anyhow!(
                    "session store did not answer within {:?}",
                    self.config.store_timeout
                ))
            })?
    }
}

impl std::fmt::Debug for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthState")
            .field("config", &self.config)
            .field("master_id", &self.master.id)
            .finish_non_exhaustive()
    }
}
