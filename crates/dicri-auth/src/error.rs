//! Authentication error types.

use dicri_core::error::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email, wrong password, missing or malformed hash,
    /// inactive account — all collapsed into one variant so the
    /// caller cannot enumerate users.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("token has expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    TokenInvalid(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for CoreError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials
            | AuthError::TokenExpired
            | AuthError::TokenInvalid(_) => CoreError::Unauthorized,
            AuthError::InvalidInput(message) => CoreError::Validation { message },
            AuthError::Crypto(msg) => CoreError::Crypto(msg),
        }
    }
}
