use thiserror::Error;

use crate::user::errors::UserError;

/// Top-level error for token issuance and lookup.
///
/// `InvalidCredentials` is the only client-facing variant; everything else
/// is an infrastructure failure.
#[derive(Debug, Clone, Error)]
pub enum TokenError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token generation failed: {0}")]
    Generation(#[from] auth::TokenError),

    #[error("Password verification failed: {0}")]
    Password(#[from] auth::PasswordError),

    #[error("User lookup failed: {0}")]
    User(#[from] UserError),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for TokenError {
    fn from(err: anyhow::Error) -> Self {
        TokenError::Unknown(err.to_string())
    }
}
