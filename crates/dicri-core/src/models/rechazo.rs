//! Rechazo domain model — one immutable rejection event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Append-only: rechazos are never updated or deleted. The "current"
/// rejection reason is the most recent by `fecha`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rechazo {
    pub id: Uuid,
    pub expediente_id: Uuid,
    /// The coordinator who rejected the expediente.
    pub usuario_id: Uuid,
    pub justificacion: String,
    pub fecha: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRechazo {
    pub expediente_id: Uuid,
    pub usuario_id: Uuid,
    pub justificacion: String,
}
