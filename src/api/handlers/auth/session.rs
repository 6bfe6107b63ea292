//! Session cookie helpers and session issuance.

use axum::{
    http::{
        HeaderMap, HeaderValue, StatusCode,
        header::{COOKIE, InvalidHeaderValue, SET_COOKIE},
    },
    response::{IntoResponse, Response},
};
use tracing::error;

use super::{
    state::{AuthConfig, AuthState},
    token::AuthToken,
};
use crate::api::handlers::error::ApiError;

pub const SESSION_COOKIE_NAME: &str = "SESSION_ID";

/// `Max-Age` of a disable-cookie. Browsers drop a cookie with a non-positive
/// max-age immediately; on the wire it is written as `Max-Age=0`.
const DISABLED_MAX_AGE: i64 = -1;

/// Cookie carrying a freshly minted session token.
pub(crate) fn session_cookie(
    config: &AuthConfig,
    token: &str,
) -> Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::from_str(&render_cookie(config, token, None))
}

/// Cookie that overwrites the session with an empty value and expires it.
pub(crate) fn disable_session_cookie(
    config: &AuthConfig,
) -> Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::from_str(&render_cookie(config, "", Some(DISABLED_MAX_AGE)))
}

fn render_cookie(config: &AuthConfig, value: &str, max_age: Option<i64>) -> String {
    let mut cookie = format!("{SESSION_COOKIE_NAME}={value}; Path=/");
    if let Some(max_age) = max_age {
        cookie.push_str(&format!("; Max-Age={}", max_age.max(0)));
    }
    if config.session_cookie_http_only() {
        cookie.push_str("; HttpOnly");
    }
    if config.session_cookie_secure() {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Mint a session for `user_id` and answer 200 with the session cookie.
///
/// The caller's [`AuthToken`] is attached to the response extensions so outer
/// layers see who the request authenticated as.
pub(crate) async fn start_session(
    auth_state: &AuthState,
    user_id: i64,
) -> Result<Response, ApiError> {
    let token = auth_state.create_session(user_id).await.map_err(|err| {
        error!("Failed to create session: {err:#}");
        ApiError::Internal
    })?;
    let cookie = session_cookie(auth_state.config(), &token).map_err(|err| {
        error!("Failed to build session cookie: {err}");
        ApiError::Internal
    })?;

    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, cookie);
    let mut response = (StatusCode::OK, headers).into_response();
    response
        .extensions_mut()
        .insert(AuthToken::from_user_id(user_id));
    Ok(response)
}

/// Read the session token from the `Cookie` header. Empty values count as missing.
pub(crate) fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|header| header.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| {
            let (key, val) = pair.trim().split_once('=')?;
            (key.trim() == SESSION_COOKIE_NAME).then(|| val.trim().to_string())
        })
        .filter(|token| !token.is_empty())
}
