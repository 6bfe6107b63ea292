//! Request gates.
//!
//! `require_session` protects the user-facing routes with the session cookie;
//! `require_basic_auth` protects service routes with the fixed master
//! credential. They do not depend on each other and can be stacked on the same
//! route group.

use axum::{
    extract::{Extension, Request},
    http::{
        HeaderMap, HeaderValue, StatusCode,
        header::{AUTHORIZATION, SET_COOKIE, WWW_AUTHENTICATE},
    },
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use base64ct::{Base64, Encoding};
use std::sync::Arc;
use tracing::{debug, error, warn};

use super::{
    LOGIN_PATH,
    session::{disable_session_cookie, extract_session_token},
    state::{AuthConfig, AuthState},
    store::SessionError,
    token::AuthToken,
};

const BASIC_AUTH_CHALLENGE: &str = "Basic realm=\"xssdemo\", charset=\"UTF-8\"";

/// Resolve the session cookie and attach the user id, or send the client to the login page.
pub async fn require_session(
    Extension(auth_state): Extension<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = extract_session_token(request.headers()) else {
        debug!("no session cookie, redirecting to login");
        return Redirect::to(LOGIN_PATH).into_response();
    };

    match auth_state.resolve_session(&token).await {
        Ok(user_id) if user_id > 0 => {
            request
                .extensions_mut()
                .insert(AuthToken::from_user_id(user_id));
            next.run(request).await
        }
        Ok(user_id) => {
            // The binding is left in the store; only the client copy is dropped.
            warn!(user_id, "session bound to an invalid user id, disabling cookie");
            disabled_session_redirect(auth_state.config())
        }
        Err(SessionError::NotFound) => {
            debug!("unknown session token, redirecting to login");
            Redirect::to(LOGIN_PATH).into_response()
        }
        Err(SessionError::Store(err)) => {
            error!("Failed to resolve session: {err:#}");
            Redirect::to(LOGIN_PATH).into_response()
        }
    }
}

/// Disable-cookie plus a redirect to the login page.
pub(crate) fn disabled_session_redirect(config: &AuthConfig) -> Response {
    let mut headers = HeaderMap::new();
    match disable_session_cookie(config) {
        Ok(cookie) => {
            headers.insert(SET_COOKIE, cookie);
        }
        Err(err) => error!("Failed to build disable cookie: {err}"),
    }
    (headers, Redirect::to(LOGIN_PATH)).into_response()
}

/// Let the request through only when it carries the master basic-auth credential.
pub async fn require_basic_auth(
    Extension(auth_state): Extension<Arc<AuthState>>,
    request: Request,
    next: Next,
) -> Response {
    let authorized = basic_credentials(request.headers())
        .is_some_and(|(id, password)| auth_state.master().matches(&id, &password));

    if authorized {
        return next.run(request).await;
    }

    warn!("basic auth rejected");
    let mut headers = HeaderMap::new();
    headers.insert(
        WWW_AUTHENTICATE,
        HeaderValue::from_static(BASIC_AUTH_CHALLENGE),
    );
    (StatusCode::UNAUTHORIZED, headers, "unauthorized").into_response()
}

/// Decode `Authorization: Basic <base64(id:password)>`.
fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let (scheme, encoded) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = Base64::decode_vec(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (id, password) = decoded.split_once(':')?;
    Some((id.to_string(), password.to_string()))
}
