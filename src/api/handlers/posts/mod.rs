//! Post endpoints. Every handler here sits behind `require_session` and
//! receives the caller as an [`AuthToken`].

mod storage;

use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};
use utoipa::ToSchema;

pub use storage::{Post, PostStore};

use super::{
    auth::{AuthState, AuthToken},
    error::ApiError,
    pages, with_deadline,
};

#[derive(ToSchema, Deserialize, Debug)]
pub struct PostRequest {
    pub title: String,
    pub body: String,
}

impl PostRequest {
    fn validate(&self) -> Result<(), ApiError> {
        if self.title.is_empty() {
            debug!("title must not be empty");
            return Err(ApiError::MalformedInput);
        }
        if self.body.is_empty() {
            debug!("body must not be empty");
            return Err(ApiError::MalformedInput);
        }
        Ok(())
    }
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Caller's posts, newest first", body = String, content_type = "text/html"),
        (status = 303, description = "No valid session, redirect to the login page")
    ),
    tag = "posts"
)]
#[instrument(skip_all, fields(user = token.as_str()))]
pub async fn list(
    token: AuthToken,
    auth_state: Extension<Arc<AuthState>>,
    posts: Extension<Arc<dyn PostStore>>,
) -> Result<Html<String>, ApiError> {
    let user_id = token.user_id()?;
    let limit = auth_state.config().store_timeout();
    let posts = with_deadline(limit, "post listing", posts.list_posts(user_id))
        .await?
        .map_err(|err| {
            error!("Failed to list posts: {err:#}");
            ApiError::Internal
        })?;
    Ok(Html(pages::render_posts(&posts)))
}

#[utoipa::path(
    post,
    path = "/",
    request_body = PostRequest,
    responses(
        (status = 201, description = "Post created"),
        (status = 400, description = "Malformed payload", body = String),
        (status = 303, description = "No valid session, redirect to the login page")
    ),
    tag = "posts"
)]
#[instrument(skip_all, fields(user = token.as_str()))]
pub async fn create(
    token: AuthToken,
    auth_state: Extension<Arc<AuthState>>,
    posts: Extension<Arc<dyn PostStore>>,
    payload: Option<Json<PostRequest>>,
) -> Result<Response, ApiError> {
    let Some(Json(request)) = payload else {
        debug!("post payload missing or not valid JSON");
        return Err(ApiError::MalformedInput);
    };
    let user_id = token.user_id()?;
    request.validate()?;

    let limit = auth_state.config().store_timeout();
    let post_id = with_deadline(
        limit,
        "post insert",
        posts.insert_post(user_id, &request.title, &request.body),
    )
    .await?
    .map_err(|err| {
        error!("Failed to insert post: {err:#}");
        ApiError::Internal
    })?;
    info!(post_id, "post created");
    Ok(StatusCode::CREATED.into_response())
}

#[utoipa::path(
    delete,
    path = "/posts/{id}",
    params(("id" = i64, Path, description = "Post id")),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 404, description = "No such post owned by the caller", body = String),
        (status = 303, description = "No valid session, redirect to the login page")
    ),
    tag = "posts"
)]
#[instrument(skip_all, fields(user = token.as_str()))]
pub async fn delete(
    token: AuthToken,
    auth_state: Extension<Arc<AuthState>>,
    posts: Extension<Arc<dyn PostStore>>,
    Path(post_id): Path<i64>,
) -> Result<Response, ApiError> {
    let user_id = token.user_id()?;
    let limit = auth_state.config().store_timeout();
    let deleted = with_deadline(limit, "post delete", posts.delete_post(user_id, post_id))
        .await?
        .map_err(|err| {
            error!("Failed to delete post: {err:#}");
            ApiError::Internal
        })?;
    if !deleted {
        return Err(ApiError::NotFound);
    }
    info!(post_id, "post deleted");
    Ok(StatusCode::NO_CONTENT.into_response())
}
