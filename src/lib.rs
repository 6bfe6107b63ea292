//! # xssdemo
//!
//! A small multi-user blog used as a target for web-security exercises
//! (stored/reflected XSS, session fixation, cookie theft).
//!
//! ## Sessions
//!
//! Logging in or signing up mints a random session token (UUID v4) bound to the
//! user id and hands it to the browser in the `SESSION_ID` cookie. The binding
//! lives in a [`SessionStore`](api::handlers::auth::SessionStore), either an
//! in-process map guarded by a single mutex or a Redis hash reached through a
//! connection pool. The backend is picked once at startup.
//!
//! ## Deliberate weaknesses
//!
//! The demo keeps the weaknesses the exercises rely on:
//!
//! - In-memory sessions never expire.
//! - Logout only clears the client cookie, the server-side binding stays valid.
//! - The session cookie is readable from script unless `--session-cookie-http-only` is set.
//! - Post titles, post bodies and the `error` query parameter of the login and
//!   signup pages are written into HTML without escaping.

pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
