//! Account directory error types.

use thiserror::Error;

use crate::db::RepositoryError;
use crate::validation::ValidationErrors;

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    /// The record failed validation. Nothing was written.
    #[error("validation failed: {0}")]
    Invalid(ValidationErrors),

    /// User not found.
    #[error("user not found")]
    NotFound,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Argon2 rejected the configured cost parameters.
    #[error("invalid password hashing parameters: {0}")]
    HashingParams(String),
}

impl AccountError {
    /// The validation failures, if this is a validation error.
    #[must_use]
    pub const fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Invalid(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for AccountError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Invalid(errors)
    }
}
