//! Shared helpers for router-level handler tests.

use crate::api::{
    handlers::{
        auth::{
            AuthConfig, AuthState, CredentialStore, InsertUserError, MasterCredentials,
            MemorySessionStore, SESSION_COOKIE_NAME, SessionStore, User,
        },
        posts::{Post, PostStore},
    },
    router,
};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, header::SET_COOKIE},
    response::Response,
};
use base64ct::{Base64, Encoding};
use secrecy::SecretString;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tokio::sync::Mutex;

pub(crate) const MASTER_ID: &str = "admin";
pub(crate) const MASTER_PASSWORD: &str = "s3cret";

/// Credential store backed by a vector; can be switched to fail or hang on every call.
#[derive(Default)]
pub(crate) struct MemoryCredentialStore {
    users: Mutex<Vec<User>>,
    unavailable: AtomicBool,
    stalled: AtomicBool,
}

impl MemoryCredentialStore {
    pub(crate) fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub(crate) fn set_stalled(&self, stalled: bool) {
        self.stalled.store(stalled, Ordering::SeqCst);
    }

    async fn check(&self) -> Result<()> {
        if self.stalled.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(anyhow!("credential store unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_user_by_name(&self, name: &str) -> Result<Option<User>> {
        self.check().await?;
        let users = self.users.lock().await;
        Ok(users.iter().find(|user| user.name == name).cloned())
    }

    async fn insert_user(&self, name: &str, password_hash: &str) -> Result<i64, InsertUserError> {
        self.check().await?;
        let mut users = self.users.lock().await;
        if users.iter().any(|user| user.name == name) {
            return Err(InsertUserError::Duplicate);
        }
        let id = i64::try_from(users.len()).map_err(anyhow::Error::from)? + 1;
        users.push(User {
            id,
            name: name.to_string(),
            password_hash: password_hash.to_string(),
        });
        Ok(id)
    }

    async fn ping(&self) -> Result<()> {
        self.check().await
    }
}

#[derive(Default)]
pub(crate) struct MemoryPostStore {
    posts: Mutex<Vec<Post>>,
    stalled: AtomicBool,
}

impl MemoryPostStore {
    pub(crate) fn set_stalled(&self, stalled: bool) {
        self.stalled.store(stalled, Ordering::SeqCst);
    }

    async fn wait_if_stalled(&self) {
        if self.stalled.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
    }
}

#[async_trait]
impl PostStore for MemoryPostStore {
    async fn list_posts(&self, user_id: i64) -> Result<Vec<Post>> {
        self.wait_if_stalled().await;
        let posts = self.posts.lock().await;
        let mut owned: Vec<Post> = posts
            .iter()
            .filter(|post| post.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(owned)
    }

    async fn insert_post(&self, user_id: i64, title: &str, body: &str) -> Result<i64> {
        self.wait_if_stalled().await;
        let mut posts = self.posts.lock().await;
        let id = i64::try_from(posts.len())? + 1;
        posts.push(Post {
            id,
            user_id,
            title: title.to_string(),
            body: body.to_string(),
        });
        Ok(id)
    }

    async fn delete_post(&self, user_id: i64, post_id: i64) -> Result<bool> {
        self.wait_if_stalled().await;
        let mut posts = self.posts.lock().await;
        let before = posts.len();
        posts.retain(|post| !(post.id == post_id && post.user_id == user_id));
        Ok(posts.len() != before)
    }
}

/// Router wired to in-memory stores, with handles to each store.
pub(crate) struct TestApp {
    pub(crate) router: Router,
    pub(crate) sessions: Arc<MemorySessionStore>,
    pub(crate) credentials: Arc<MemoryCredentialStore>,
    pub(crate) posts: Arc<MemoryPostStore>,
}

impl TestApp {
    pub(crate) fn new() -> Self {
        Self::with_config(AuthConfig::new())
    }

    pub(crate) fn with_config(config: AuthConfig) -> Self {
        let sessions = Arc::new(MemorySessionStore::new());
        let credentials = Arc::new(MemoryCredentialStore::default());
        let posts = Arc::new(MemoryPostStore::default());
        let session_store: Arc<dyn SessionStore> = sessions.clone();
        let auth_state = Arc::new(AuthState::new(
            config,
            session_store,
            MasterCredentials::new(
                MASTER_ID.to_string(),
                SecretString::from(MASTER_PASSWORD.to_string()),
            ),
        ));
        let credential_store: Arc<dyn CredentialStore> = credentials.clone();
        let post_store: Arc<dyn PostStore> = posts.clone();
        Self {
            router: router(auth_state, credential_store, post_store),
            sessions,
            credentials,
            posts,
        }
    }

    /// Sign up `name` and return the session token from the response cookie.
    pub(crate) async fn signup(&self, name: &str, password: &str) -> Result<String> {
        let response = self
            .send(json_request(
                "POST",
                "/users/signup",
                &user_body(name, password),
                None,
            )?)
            .await?;
        session_token(&response).ok_or_else(|| anyhow!("signup did not set a session cookie"))
    }

    pub(crate) async fn send(&self, request: Request<Body>) -> Result<Response> {
        use tower::ServiceExt;
        Ok(self.router.clone().oneshot(request).await?)
    }
}

pub(crate) fn user_body(name: &str, password: &str) -> String {
    serde_json::json!({ "name": name, "password": password }).to_string()
}

pub(crate) fn json_request(
    method: &str,
    uri: &str,
    body: &str,
    token: Option<&str>,
) -> Result<Request<Body>> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("cookie", format!("{SESSION_COOKIE_NAME}={token}"));
    }
    Ok(builder.body(Body::from(body.to_string()))?)
}

pub(crate) fn get_request(uri: &str, token: Option<&str>) -> Result<Request<Body>> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header("cookie", format!("{SESSION_COOKIE_NAME}={token}"));
    }
    Ok(builder.body(Body::empty())?)
}

pub(crate) fn basic_auth_request(uri: &str, id: &str, password: &str) -> Result<Request<Body>> {
    let encoded = Base64::encode_string(format!("{id}:{password}").as_bytes());
    Ok(Request::builder()
        .method("GET")
        .uri(uri)
        .header("authorization", format!("Basic {encoded}"))
        .body(Body::empty())?)
}

/// Value of the `SESSION_ID` cookie set by the response, if any.
pub(crate) fn session_token(response: &Response) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|value| {
            let first = value.split(';').next()?;
            let (name, token) = first.split_once('=')?;
            (name == SESSION_COOKIE_NAME).then(|| token.to_string())
        })
}

pub(crate) fn set_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get(SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

pub(crate) fn location(response: &Response) -> Option<String> {
    response
        .headers()
        .get("location")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

pub(crate) async fn body_text(response: Response) -> Result<String> {
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok(String::from_utf8(bytes.to_vec())?)
}
