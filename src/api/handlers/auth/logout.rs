//! Logout endpoint.
//!
//! Only the client cookie is cleared. The server-side binding is not deleted,
//! so a copied token keeps working after logout.

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{debug, instrument};

use super::{
    middleware::disabled_session_redirect, session::extract_session_token, state::AuthState,
};

#[utoipa::path(
    get,
    path = "/users/logout",
    responses(
        (status = 200, description = "No session cookie, nothing to do"),
        (status = 303, description = "Cookie disabled, redirect to the login page")
    ),
    tag = "users"
)]
#[instrument(skip_all)]
pub async fn logout(headers: HeaderMap, auth_state: Extension<Arc<AuthState>>) -> Response {
    if extract_session_token(&headers).is_none() {
        debug!("logout without a session cookie");
        return StatusCode::OK.into_response();
    }
    disabled_session_redirect(auth_state.config())
}
