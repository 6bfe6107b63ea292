//! Credential store: user accounts keyed by unique name.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::Row;
use thiserror::Error;
use tracing::Instrument;

use super::utils::is_unique_violation;
use crate::api::db::PgStore;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub password_hash: String,
}

#[derive(Debug, Error)]
pub enum InsertUserError {
    #[error("user name already used")]
    Duplicate,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_user_by_name(&self, name: &str) -> Result<Option<User>>;

    /// Insert a new account and return its id.
    async fn insert_user(&self, name: &str, password_hash: &str) -> Result<i64, InsertUserError>;

    async fn ping(&self) -> Result<()>;
}

#[async_trait]
impl CredentialStore for PgStore {
    async fn find_user_by_name(&self, name: &str) -> Result<Option<User>> {
        let query = "SELECT id, name, password_hash FROM users WHERE name = $1";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(name)
            .fetch_optional(self.pool())
            .instrument(span)
            .await
            .context("failed to lookup user")?;

        Ok(row.map(|row| User {
            id: row.get("id"),
            name: row.get("name"),
            password_hash: row.get("password_hash"),
        }))
    }

    async fn insert_user(&self, name: &str, password_hash: &str) -> Result<i64, InsertUserError> {
        let query = "INSERT INTO users (name, password_hash) VALUES ($1, $2) RETURNING id";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(name)
            .bind(password_hash)
            .fetch_one(self.pool())
            .instrument(span)
            .await;

        match row {
            Ok(row) => Ok(row.get("id")),
            Err(err) if is_unique_violation(&err) => Err(InsertUserError::Duplicate),
            Err(err) => Err(InsertUserError::Store(
                anyhow::Error::new(err).context("failed to insert user"),
            )),
        }
    }

    async fn ping(&self) -> Result<()> {
        PgStore::ping(self).await
    }
}
