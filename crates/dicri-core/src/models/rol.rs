//! Rol domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rol {
    pub id: Uuid,
    /// Unique name, e.g. `TECNICO`, `COORDINADOR`.
    pub nombre: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRol {
    pub nombre: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateRol {
    pub nombre: Option<String>,
}
