use crate::api::{
    db::PgStore,
    handlers::{
        admin,
        auth::{self, AuthState, CredentialStore},
        health, pages,
        posts::{self, PostStore},
    },
};
use anyhow::Result;
use axum::{
    Extension, Router,
    body::Body,
    extract::{ConnectInfo, MatchedPath},
    http::{HeaderName, HeaderValue, Request},
    middleware,
    routing::{delete, get},
};
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{Span, error, info, info_span};
use ulid::Ulid;

pub mod db;
pub mod handlers;
// OpenAPI document for the `openapi` binary lives in openapi.rs.
mod openapi;

pub use openapi::openapi;

/// Build the application router.
///
/// - `/health` and `/users/*` are public;
/// - `/` and `/posts/:id` require a session cookie;
/// - `/admin/*` requires the master basic-auth credential.
pub fn router(
    auth_state: Arc<AuthState>,
    credentials: Arc<dyn CredentialStore>,
    posts: Arc<dyn PostStore>,
) -> Router {
    let users = Router::new()
        .route(
            "/login",
            get(pages::login_form).post(auth::login::login),
        )
        .route(
            "/signup",
            get(pages::signup_form).post(auth::signup::signup),
        )
        .route("/logout", get(auth::logout::logout));

    let protected = Router::new()
        .route("/", get(posts::list).post(posts::create))
        .route("/posts/:id", delete(posts::delete))
        .route_layer(middleware::from_fn(auth::require_session));

    let service = Router::new()
        .route("/admin/sessions", get(admin::sessions))
        .route_layer(middleware::from_fn(auth::require_basic_auth));

    Router::new()
        .route("/health", get(health::health))
        .nest("/users", users)
        .merge(protected)
        .merge(service)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(Extension(auth_state))
                .layer(Extension(credentials))
                .layer(Extension(posts)),
        )
}

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(port: u16, auth_state: Arc<AuthState>, database: PgStore) -> Result<()> {
    let database = Arc::new(database);
    let credentials: Arc<dyn CredentialStore> = database.clone();
    let posts: Arc<dyn PostStore> = database;

    let app = router(auth_state, credentials, posts);

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Gracefully shutdown"),
        Err(err) => error!("Failed to listen for shutdown signal: {err}"),
    }
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);
    let remote_addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or_else(|| "unknown".to_string(), |info| info.0.to_string());

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        client.address = %remote_addr,
        request_id
    )
}
