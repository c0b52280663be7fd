//! Shared primitives for all Rust crates in Shopgate.

#![forbid(unsafe_code)]

/// Authentication primitives shared across services.
pub mod auth;
/// Typed identifiers for persisted authorization records.
pub mod ids;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use auth::UserIdentity;
pub use ids::{PermissionId, ResourceId, RoleId, TeamId, UserId};

/// Result type used across Shopgate crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Caller identity is missing or malformed.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Caller is identified but blocked by authorization policy.
    ///
    /// The message carries the denial reason for logs; transports must not
    /// echo it to end users.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::{AppError, NonEmptyString};

    #[test]
    fn non_empty_string_rejects_whitespace() {
        let result = NonEmptyString::new("   ");
        assert!(result.is_err());
    }

    #[test]
    fn non_empty_string_keeps_original_value() {
        let value = NonEmptyString::new(" Catalog Editors ");
        assert!(value.is_ok());
        assert_eq!(
            value.map(String::from).unwrap_or_default(),
            " Catalog Editors "
        );
    }

    #[test]
    fn forbidden_error_formats_reason() {
        let error = AppError::Forbidden("missing edit:product".to_owned());
        assert_eq!(error.to_string(), "forbidden: missing edit:product");
    }
}
