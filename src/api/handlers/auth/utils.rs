//! Small helpers for credential handling.

use sha2::{Digest, Sha256};

/// SHA-256 of the password, lowercase hex (64 characters).
pub(crate) fn hash_password(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}

/// Compare a supplied password against a stored hex digest.
pub(crate) fn password_matches(password: &str, stored_hash: &str) -> bool {
    hash_password(password).as_bytes() == stored_hash.as_bytes()
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}
