//! Redis-backed sessions.
//!
//! Each session is a hash stored under the token with a single `id` field.
//! Connections come from a bounded `deadpool` pool; the pooled connection is
//! returned when its guard drops, on success and error alike. No TTL is set.

use anyhow::{Context, anyhow};
use async_trait::async_trait;
use deadpool_redis::{
    Config, Connection, Pool, PoolConfig, Runtime,
    redis::{self, AsyncCommands},
};
use std::collections::HashMap;
use tracing::{Instrument, info_span};

use super::{SessionError, SessionStore};

const SESSION_ID_FIELD: &str = "id";

#[derive(Clone)]
pub struct RedisSessionStore {
    pool: Pool,
}

impl std::fmt::Debug for RedisSessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisSessionStore")
            .field("pool", &self.pool.status())
            .finish()
    }
}

impl RedisSessionStore {
    /// Build the pool. No connection is opened until the first operation.
    ///
    /// # Errors
    /// Returns an error if the URL is invalid or the pool cannot be built.
    pub fn connect(url: &str, max_connections: usize) -> anyhow::Result<Self> {
        let mut config = Config::from_url(url);
        config.pool = Some(PoolConfig::new(max_connections));
        let pool = config
            .create_pool(Some(Runtime::Tokio1))
            .context("failed to create redis pool")?;
        Ok(Self { pool })
    }

    async fn connection(&self) -> Result<Connection, SessionError> {
        let span = info_span!("redis.acquire", db.system = "redis");
        self.pool
            .get()
            .instrument(span)
            .await
            .map_err(|err| anyhow!("failed to acquire redis connection: {err}").into())
    }
}

/// Read the user id out of an `HGETALL` reply; anything unexpected fails closed.
fn user_id_from_fields(fields: &HashMap<String, String>) -> Result<i64, SessionError> {
    fields
        .get(SESSION_ID_FIELD)
        .and_then(|value| value.trim().parse::<i64>().ok())
        .ok_or(SessionError::NotFound)
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn put(&self, token: &str, user_id: i64) -> Result<(), SessionError> {
        let mut conn = self.connection().await?;
        let span = info_span!("redis.command", db.system = "redis", db.operation = "HSET");
        let () = conn
            .hset(token, SESSION_ID_FIELD, user_id)
            .instrument(span)
            .await
            .context("failed to store session")?;
        Ok(())
    }

    async fn resolve(&self, token: &str) -> Result<i64, SessionError> {
        let mut conn = self.connection().await?;
        let span = info_span!("redis.command", db.system = "redis", db.operation = "HGETALL");
        let fields: HashMap<String, String> = conn
            .hgetall(token)
            .instrument(span)
            .await
            .context("failed to read session")?;
        user_id_from_fields(&fields)
    }

    async fn len(&self) -> Result<usize, SessionError> {
        let mut conn = self.connection().await?;
        let size: usize = redis::cmd("DBSIZE")
            .query_async(&mut conn)
            .await
            .context("failed to count sessions")?;
        Ok(size)
    }

    async fn ping(&self) -> Result<(), SessionError> {
        let mut conn = self.connection().await?;
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .context("failed to ping redis")?;
        Ok(())
    }
}
