//! Authentication: session stores, request gates, and the login/signup/logout flow.
//!
//! ## Session lifecycle
//!
//! Signup and login mint a token with [`SessionStore::create`] and send it in
//! the `SESSION_ID` cookie. [`require_session`] resolves the cookie on every
//! protected request:
//!
//! - missing cookie or unknown token: `303` to `/users/login`;
//! - token bound to a user id `<= 0`: disable-cookie plus `303` to `/users/login`;
//! - otherwise the user id is attached as an [`AuthToken`].
//!
//! Nothing ever removes a binding. Logout and the invalid-id path only tell
//! the browser to drop its cookie.
//!
//! ## Basic auth
//!
//! [`require_basic_auth`] checks a fixed master credential and answers `401`
//! with a `WWW-Authenticate` challenge on mismatch. It is unrelated to user
//! sessions and guards the service routes under `/admin`.

pub(crate) mod login;
pub(crate) mod logout;
mod middleware;
mod session;
pub(crate) mod signup;
mod state;
mod storage;
mod store;
mod token;
pub(crate) mod types;
mod utils;

pub use middleware::{require_basic_auth, require_session};
pub use session::SESSION_COOKIE_NAME;
pub use state::{AuthConfig, AuthState, MasterCredentials};
pub use storage::{CredentialStore, InsertUserError, User};
pub use store::{MemorySessionStore, RedisSessionStore, SessionError, SessionStore};
pub use token::AuthToken;
#[cfg(test)]
pub(crate) use utils::hash_password;

/// Where unauthenticated requests are sent.
pub const LOGIN_PATH: &str = "/users/login";
