//! In-process session map.
//!
//! Every read and write takes the same mutex for the whole access. Entries are
//! never evicted: they live until the process exits.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

use super::{SessionError, SessionStore};

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<String, i64>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn put(&self, token: &str, user_id: i64) -> Result<(), SessionError> {
        let mut sessions = self.sessions.lock().await;
        sessions.insert(token.to_string(), user_id);
        Ok(())
    }

    async fn resolve(&self, token: &str) -> Result<i64, SessionError> {
        let sessions = self.sessions.lock().await;
        sessions.get(token).copied().ok_or(SessionError::NotFound)
    }

    async fn len(&self) -> Result<usize, SessionError> {
        Ok(self.sessions.lock().await.len())
    }

    async fn ping(&self) -> Result<(), SessionError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, Result};
    use std::{collections::HashSet, sync::Arc};

    #[tokio::test]
    async fn create_then_resolve_returns_user_id() -> Result<()> {
        let store = MemorySessionStore::new();
        let token = store.create(42).await?;
        assert_eq!(store.resolve(&token).await?, 42);
        Ok(())
    }

    #[tokio::test]
    async fn resolve_unknown_token_is_not_found() {
        let store = MemorySessionStore::new();
        let result = store.resolve("missing").await;
        assert!(matches!(result, Err(SessionError::NotFound)));
    }

    #[tokio::test]
    async fn put_keeps_non_positive_ids_verbatim() -> Result<()> {
        let store = MemorySessionStore::new();
        store.put("placeholder", 0).await?;
        store.put("negative", -7).await?;
        assert_eq!(store.resolve("placeholder").await?, 0);
        assert_eq!(store.resolve("negative").await?, -7);
        assert_eq!(store.len().await?, 2);
        Ok(())
    }

    #[tokio::test]
    async fn same_user_gets_a_new_token_per_login() -> Result<()> {
        let store = MemorySessionStore::new();
        let first = store.create(1).await?;
        let second = store.create(1).await?;
        assert_ne!(first, second);
        assert_eq!(store.resolve(&first).await?, 1);
        assert_eq!(store.resolve(&second).await?, 1);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_yield_distinct_tokens() -> Result<()> {
        const LOGINS: i64 = 2_000;
        let store = Arc::new(MemorySessionStore::new());

        let mut handles = Vec::new();
        for user_id in 1..=LOGINS {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.create(user_id).await.map(|token| (token, user_id))
            }));
        }

        let mut tokens = HashSet::new();
        for handle in handles {
            let (token, user_id) = handle.await.context("login task panicked")??;
            assert_eq!(store.resolve(&token).await?, user_id);
            tokens.insert(token);
        }

        assert_eq!(tokens.len(), usize::try_from(LOGINS)?);
        assert_eq!(store.len().await?, tokens.len());
        Ok(())
    }
}
