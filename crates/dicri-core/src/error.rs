//! Error taxonomy for the DICRI system.
//!
//! Every business operation returns one of these variants. The routing
//! layer (out of scope here) maps each variant to a transport status;
//! `Database`, `Crypto` and `Internal` must surface to callers as a
//! generic internal error with the detail logged, never forwarded.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    /// Uniqueness violation (duplicate numero, email, rol/permiso name).
    #[error("Entity already exists: {entity}")]
    Conflict { entity: String },

    /// No valid identity, or any credential failure. Deliberately
    /// carries no detail so that unknown email, bad password and
    /// malformed hash are indistinguishable to the caller.
    #[error("invalid credentials")]
    Unauthorized,

    /// Valid identity, insufficient role/permission.
    #[error("Authorization denied: {reason}")]
    Forbidden { reason: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cryptography error: {0}")]
    Crypto(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    pub fn conflict(entity: impl Into<String>) -> Self {
        Self::Conflict {
            entity: entity.into(),
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
