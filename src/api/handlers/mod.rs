//! Route handlers and the helpers they share.

pub mod admin;
pub mod auth;
pub mod error;
pub mod health;
pub mod pages;
pub mod posts;

#[cfg(test)]
pub(crate) mod test_support;

use std::{future::Future, time::Duration};
use tokio::time::timeout;
use tracing::error;

use error::ApiError;

/// Await a store call, turning an expired deadline into an internal error.
pub(crate) async fn with_deadline<T>(
    limit: Duration,
    step: &str,
    operation: impl Future<Output = T>,
) -> Result<T, ApiError> {
    timeout(limit, operation).await.map_err(|_| {
        error!("{step} did not finish within {limit:?}");
        ApiError::Internal
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn with_deadline_passes_value_through() {
        let value = with_deadline(Duration::from_secs(1), "noop", async { 7 }).await;
        assert!(matches!(value, Ok(7)));
    }

    #[tokio::test]
    async fn with_deadline_maps_timeout_to_internal() {
        let value = with_deadline(
            Duration::from_millis(10),
            "stalled",
            std::future::pending::<()>(),
        )
        .await;
        assert!(matches!(value, Err(ApiError::Internal)));
    }
}
