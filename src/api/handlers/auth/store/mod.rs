//! Session storage backends.
//!
//! A session is a binding from a random token to a user id. Both backends
//! implement [`SessionStore`]; the server picks one at startup and hands the
//! same instance to every component through [`AuthState`](super::AuthState).

mod memory;
mod redis;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

pub use memory::MemorySessionStore;
pub use redis::RedisSessionStore;

#[derive(Debug, Error)]
pub enum SessionError {
    /// Token unknown, or the stored record could not be read as a user id.
    #[error("session not found")]
    NotFound,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Write the `token -> user_id` binding, replacing any previous one.
    async fn put(&self, token: &str, user_id: i64) -> Result<(), SessionError>;

    /// Look up the user id bound to `token`.
    async fn resolve(&self, token: &str) -> Result<i64, SessionError>;

    /// Number of bindings currently held.
    async fn len(&self) -> Result<usize, SessionError>;

    async fn ping(&self) -> Result<(), SessionError>;

    /// Mint a fresh token for `user_id` and store it.
    async fn create(&self, user_id: i64) -> Result<String, SessionError> {
        let token = generate_session_token();
        self.put(&token, user_id).await?;
        Ok(token)
    }
}

/// Random 128-bit token, formatted as a hyphenated UUID.
pub(crate) fn generate_session_token() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generate_session_token_is_uuid_shaped() {
        let token = generate_session_token();
        assert_eq!(token.len(), 36);
        assert!(Uuid::parse_str(&token).is_ok());
    }

    #[test]
    fn generate_session_token_does_not_repeat() {
        let tokens: HashSet<String> = (0..10_000).map(|_| generate_session_token()).collect();
        assert_eq!(tokens.len(), 10_000);
    }
}
