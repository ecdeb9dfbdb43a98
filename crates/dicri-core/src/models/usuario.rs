//! Usuario domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usuario {
    pub id: Uuid,
    pub nombre: String,
    /// Unique across the system.
    pub email: String,
    /// Bcrypt hash, canonical `$2b$` prefix after normalization.
    pub password_hash: String,
    pub activo: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUsuario {
    pub nombre: String,
    pub email: String,
    /// Already hashed — raw passwords never reach the repository.
    pub password_hash: String,
    pub activo: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateUsuario {
    pub nombre: Option<String>,
    pub email: Option<String>,
    pub activo: Option<bool>,
}
