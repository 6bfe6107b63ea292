//! Signup endpoint.

use axum::{Json, extract::Extension, response::Response};
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

use super::{
    session::start_session,
    state::AuthState,
    storage::{CredentialStore, InsertUserError},
    types::UserRequest,
    utils::hash_password,
};
use crate::api::handlers::{error::ApiError, with_deadline};

#[utoipa::path(
    post,
    path = "/users/signup",
    request_body = UserRequest,
    responses(
        (status = 200, description = "Account created, session cookie set"),
        (status = 400, description = "Malformed payload or name already used", body = String),
        (status = 500, description = "Credential or session store failure", body = String)
    ),
    tag = "users"
)]
#[instrument(skip_all)]
pub async fn signup(
    auth_state: Extension<Arc<AuthState>>,
    credentials: Extension<Arc<dyn CredentialStore>>,
    payload: Option<Json<UserRequest>>,
) -> Result<Response, ApiError> {
    let Some(Json(request)) = payload else {
        debug!("signup payload missing or not valid JSON");
        return Err(ApiError::MalformedInput);
    };
    request.validate()?;

    let password_hash = hash_password(&request.password);
    let limit = auth_state.config().store_timeout();
    let inserted = with_deadline(
        limit,
        "user insert",
        credentials.insert_user(&request.name, &password_hash),
    )
    .await?;

    let user_id = match inserted {
        Ok(user_id) => user_id,
        Err(InsertUserError::Duplicate) => {
            info!("signup with a name that is already used");
            return Err(ApiError::Conflict(request.name));
        }
        Err(InsertUserError::Store(err)) => {
            error!("Failed to insert user: {err:#}");
            return Err(ApiError::Internal);
        }
    };

    info!(user_id, "signed up");
    start_session(&auth_state, user_id).await
}
