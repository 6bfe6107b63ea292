use super::handlers::{admin, auth, health, pages, posts};
use utoipa::{
    OpenApi,
    openapi::{InfoBuilder, License, Tag},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        pages::login_form,
        pages::signup_form,
        auth::login::login,
        auth::signup::signup,
        auth::logout::logout,
        posts::list,
        posts::create,
        posts::delete,
        admin::sessions,
    ),
    components(schemas(
        health::Health,
        auth::types::UserRequest,
        posts::PostRequest,
        posts::Post,
        admin::SessionStats,
    ))
)]
struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();

    // Use Cargo.toml metadata instead of the derive defaults.
    let mut info = InfoBuilder::new()
        .title(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .description(optional_str(env!("CARGO_PKG_DESCRIPTION")))
        .build();
    info.license = optional_str(env!("CARGO_PKG_LICENSE")).map(|identifier| {
        let mut license = License::new(identifier);
        license.identifier = Some(identifier.to_string());
        license
    });
    doc.info = info;

    doc.tags = Some(vec![
        tag("users", "Signup, login and logout"),
        tag("posts", "Per-user posts"),
        tag("admin", "Service routes behind basic auth"),
        tag("health", "Liveness of the database and session store"),
    ]);
    doc
}

fn tag(name: &str, description: &str) -> Tag {
    let mut tag = Tag::new(name);
    tag.description = Some(description.to_string());
    tag
}

fn optional_str(value: &'static str) -> Option<&'static str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}
