//! Permiso domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Permiso {
    pub id: Uuid,
    /// Unique capability token, e.g. `EXPEDIENTES_APROBAR`.
    pub nombre: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePermiso {
    pub nombre: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdatePermiso {
    pub nombre: Option<String>,
}
