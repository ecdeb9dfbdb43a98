//! Indicio domain model — an evidence item under an expediente.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Indicio {
    pub id: Uuid,
    /// Parent case file. Immutable after creation.
    pub expediente_id: Uuid,
    pub objeto: Option<String>,
    pub descripcion: String,
    pub color: Option<String>,
    pub tamano: Option<String>,
    /// Weight, fixed-point with 2 fraction digits.
    pub peso: Option<Decimal>,
    pub ubicacion: Option<String>,
    pub tecnico_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateIndicio {
    pub expediente_id: Uuid,
    pub objeto: Option<String>,
    pub descripcion: String,
    pub color: Option<String>,
    pub tamano: Option<String>,
    pub peso: Option<Decimal>,
    pub ubicacion: Option<String>,
    pub tecnico_id: Uuid,
}

/// Partial update: `None` means "keep the previous value".
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateIndicio {
    pub objeto: Option<String>,
    pub descripcion: Option<String>,
    pub color: Option<String>,
    pub tamano: Option<String>,
    pub peso: Option<Decimal>,
    pub ubicacion: Option<String>,
}
