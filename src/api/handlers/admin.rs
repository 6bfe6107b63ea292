//! Service routes behind the master basic-auth credential.

use axum::{Json, extract::Extension};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, instrument};
use utoipa::ToSchema;

use super::{auth::AuthState, error::ApiError};

#[derive(ToSchema, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct SessionStats {
    /// Session bindings currently held by the store.
    pub sessions: usize,
}

#[utoipa::path(
    get,
    path = "/admin/sessions",
    responses(
        (status = 200, description = "Number of stored sessions", body = SessionStats),
        (status = 401, description = "Missing or wrong basic-auth credential", body = String),
        (status = 500, description = "Session store failure", body = String)
    ),
    tag = "admin"
)]
#[instrument(skip_all)]
pub async fn sessions(
    auth_state: Extension<Arc<AuthState>>,
) -> Result<Json<SessionStats>, ApiError> {
    let sessions = auth_state.session_count().await.map_err(|err| {
        error!("Failed to count sessions: {err}");
        ApiError::Internal
    })?;
    Ok(Json(SessionStats { sessions }))
}
