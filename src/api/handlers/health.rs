use axum::{
    body::Body,
    extract::Extension,
    http::{HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};
use utoipa::ToSchema;

use super::{
    auth::{AuthState, CredentialStore},
    with_deadline,
};
use crate::GIT_COMMIT_HASH;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct Health {
    commit: String,
    name: String,
    version: String,
    database: String,
    sessions: String,
}

fn status_label(healthy: bool) -> String {
    let label = if healthy { "ok" } else { "error" };
    label.to_string()
}

#[utoipa::path(
    get,
    path= "/health",
    responses (
        (status = 200, description = "Database and session store are healthy", body = [Health]),
        (status = 503, description = "Database or session store is unhealthy", body = [Health])
    ),
    tag= "health"
)]
// axum handler for health
pub async fn health(
    method: Method,
    credentials: Extension<Arc<dyn CredentialStore>>,
    auth_state: Extension<Arc<AuthState>>,
) -> impl IntoResponse {
    let limit = auth_state.config().store_timeout();
    let database = match with_deadline(limit, "database ping", credentials.ping()).await {
        Ok(Ok(())) => true,
        Ok(Err(err)) => {
            error!("Database health check failed: {err:#}");
            false
        }
        Err(_) => false,
    };

    let sessions = match auth_state.ping_sessions().await {
        Ok(()) => true,
        Err(err) => {
            error!("Session store health check failed: {err}");
            false
        }
    };

    let health = Health {
        commit: GIT_COMMIT_HASH.to_string(),
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: status_label(database),
        sessions: status_label(sessions),
    };

    let body = if method == Method::GET {
        Json(&health).into_response()
    } else {
        Body::empty().into_response()
    };

    let short_hash = if health.commit.len() > 7 {
        &health.commit[0..7]
    } else {
        ""
    };

    let headers = format!("{}:{}:{}", health.name, health.version, short_hash)
        .parse::<HeaderValue>()
        .map(|x_app_header_value| {
            debug!("X-App header: {:?}", x_app_header_value);

            let mut headers = HeaderMap::new();

            headers.insert("X-App", x_app_header_value);

            headers
        })
        .unwrap_or_else(|err| {
            error!("Failed to parse X-App header: {}", err);
            HeaderMap::new()
        });

    if database && sessions {
        (StatusCode::OK, headers, body)
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, headers, body)
    }
}
