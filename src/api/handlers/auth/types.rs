//! Request types for the user endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::handlers::error::ApiError;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct UserRequest {
    pub name: String,
    pub password: String,
}

impl UserRequest {
    /// Both fields must be non-empty.
    ///
    /// # Errors
    /// Returns `MalformedInput`; the failing field is only logged.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.name.is_empty() {
            tracing::debug!("name must not be empty");
            return Err(ApiError::MalformedInput);
        }
        if self.password.is_empty() {
            tracing::debug!("password must not be empty");
            return Err(ApiError::MalformedInput);
        }
        Ok(())
    }
}
