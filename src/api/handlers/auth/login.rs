//! Login endpoint.
//!
//! Flow Overview:
//! 1) A cookie that already resolves to a user short-circuits with 200.
//! 2) Decode and validate `{name, password}`.
//! 3) Look the user up by name and compare the SHA-256 digest of the password.
//! 4) Mint a session and return it in the `SESSION_ID` cookie.

use axum::{
    Json,
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

use super::{
    session::{extract_session_token, start_session},
    state::AuthState,
    storage::CredentialStore,
    token::AuthToken,
    types::UserRequest,
    utils::password_matches,
};
use crate::api::handlers::{error::ApiError, with_deadline};

#[utoipa::path(
    post,
    path = "/users/login",
    request_body = UserRequest,
    responses(
        (status = 200, description = "Logged in, session cookie set"),
        (status = 400, description = "Malformed payload or unknown user", body = String),
        (status = 401, description = "Wrong password", body = String),
        (status = 500, description = "Credential or session store failure", body = String)
    ),
    tag = "users"
)]
#[instrument(skip_all)]
pub async fn login(
    headers: HeaderMap,
    auth_state: Extension<Arc<AuthState>>,
    credentials: Extension<Arc<dyn CredentialStore>>,
    payload: Option<Json<UserRequest>>,
) -> Result<Response, ApiError> {
    if let Some(user_id) = existing_session(&headers, &auth_state).await {
        // Already logged in: no new session and no redirect.
        debug!(user_id, "login short-circuited by an existing session");
        let mut response = StatusCode::OK.into_response();
        response
            .extensions_mut()
            .insert(AuthToken::from_user_id(user_id));
        return Ok(response);
    }

    let Some(Json(request)) = payload else {
        debug!("login payload missing or not valid JSON");
        return Err(ApiError::MalformedInput);
    };
    request.validate()?;

    let limit = auth_state.config().store_timeout();
    let lookup = with_deadline(
        limit,
        "user lookup",
        credentials.find_user_by_name(&request.name),
    )
    .await?;
    let user = match lookup {
        Ok(Some(user)) => user,
        Ok(None) => return Err(ApiError::UserNotFound(request.name)),
        Err(err) => {
            error!("Failed to lookup user: {err:#}");
            return Err(ApiError::Internal);
        }
    };

    if !password_matches(&request.password, &user.password_hash) {
        info!(user_id = user.id, "password mismatch");
        return Err(ApiError::Unauthorized);
    }

    info!(user_id = user.id, "logged in");
    start_session(&auth_state, user.id).await
}

/// User id behind the request's session cookie, if it resolves to a valid user.
async fn existing_session(headers: &HeaderMap, auth_state: &AuthState) -> Option<i64> {
    let token = extract_session_token(headers)?;
    match auth_state.resolve_session(&token).await {
        Ok(user_id) if user_id > 0 => Some(user_id),
        Ok(_) => None,
        Err(err) => {
            debug!("existing session not usable: {err}");
            None
        }
    }
}
