//! Post persistence.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use sqlx::Row;
use tracing::Instrument;
use utoipa::ToSchema;

use crate::api::db::PgStore;

#[derive(ToSchema, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Post {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub body: String,
}

#[async_trait]
pub trait PostStore: Send + Sync {
    /// Posts owned by `user_id`, newest first.
    async fn list_posts(&self, user_id: i64) -> Result<Vec<Post>>;

    async fn insert_post(&self, user_id: i64, title: &str, body: &str) -> Result<i64>;

    /// Delete a post owned by `user_id`; `false` when nothing matched.
    async fn delete_post(&self, user_id: i64, post_id: i64) -> Result<bool>;
}

#[async_trait]
impl PostStore for PgStore {
    async fn list_posts(&self, user_id: i64) -> Result<Vec<Post>> {
        let query = "SELECT id, user_id, title, body FROM posts WHERE user_id = $1 ORDER BY id DESC";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let rows = sqlx::query(query)
            .bind(user_id)
            .fetch_all(self.pool())
            .instrument(span)
            .await
            .context("failed to list posts")?;

        Ok(rows
            .into_iter()
            .map(|row| Post {
                id: row.get("id"),
                user_id: row.get("user_id"),
                title: row.get("title"),
                body: row.get("body"),
            })
            .collect())
    }

    async fn insert_post(&self, user_id: i64, title: &str, body: &str) -> Result<i64> {
        let query = "INSERT INTO posts (user_id, title, body) VALUES ($1, $2, $3) RETURNING id";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(user_id)
            .bind(title)
            .bind(body)
            .fetch_one(self.pool())
            .instrument(span)
            .await
            .context("failed to insert post")?;
        Ok(row.get("id"))
    }

    async fn delete_post(&self, user_id: i64, post_id: i64) -> Result<bool> {
        let query = "DELETE FROM posts WHERE id = $1 AND user_id = $2";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "DELETE",
            db.statement = query
        );
        let result = sqlx::query(query)
            .bind(post_id)
            .bind(user_id)
            .execute(self.pool())
            .instrument(span)
            .await
            .context("failed to delete post")?;
        Ok(result.rows_affected() > 0)
    }
}
