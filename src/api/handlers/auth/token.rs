//! Request-scoped identity.
//!
//! Flow Overview: `require_session` resolves the cookie and inserts an
//! [`AuthToken`] into the request extensions; protected handlers take
//! `AuthToken` as an argument, so a handler that compiles without it cannot
//! see who is calling. The token lives only for the request.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::Redirect,
};
use tracing::error;

use super::LOGIN_PATH;
use crate::api::handlers::error::ApiError;

/// Authenticated user id, carried as its decimal string form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    #[must_use]
    pub fn from_user_id(user_id: i64) -> Self {
        Self(user_id.to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the carried id back into an integer.
    ///
    /// # Errors
    /// Returns `MalformedInput` if the token is not a decimal integer.
    pub fn user_id(&self) -> Result<i64, ApiError> {
        self.0.parse().map_err(|_| {
            error!("invalid user id in auth token: {:?}", self.0);
            ApiError::MalformedInput
        })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthToken
where
    S: Send + Sync,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Self>().cloned().ok_or_else(|| {
            error!("auth token missing from request context");
            Redirect::to(LOGIN_PATH)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode, header::LOCATION};
    use axum::response::IntoResponse;

    #[test]
    fn token_round_trips_user_id() {
        let token = AuthToken::from_user_id(42);
        assert_eq!(token.as_str(), "42");
        assert_eq!(token.user_id().ok(), Some(42));
    }

    #[test]
    fn garbage_token_is_malformed_input() {
        let token = AuthToken("forty-two".to_string());
        assert!(matches!(token.user_id(), Err(ApiError::MalformedInput)));
    }

    #[tokio::test]
    async fn extractor_reads_extension() {
        let mut request = Request::new(());
        request.extensions_mut().insert(AuthToken::from_user_id(5));
        let (mut parts, ()) = request.into_parts();
        let token = AuthToken::from_request_parts(&mut parts, &()).await;
        assert_eq!(token.ok(), Some(AuthToken::from_user_id(5)));
    }

    #[tokio::test]
    async fn extractor_redirects_without_identity() {
        let (mut parts, ()) = Request::new(()).into_parts();
        let rejection = AuthToken::from_request_parts(&mut parts, &()).await;
        let Err(redirect) = rejection else {
            panic!("expected a redirect rejection");
        };
        let response = redirect.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(LOCATION).and_then(|v| v.to_str().ok()),
            Some(LOGIN_PATH)
        );
    }
}
