//! Expediente domain model and its lifecycle states.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};

/// Lifecycle state of an expediente.
///
/// The external boundary keeps the legacy string values (note that the
/// review state is spelled `PARA REVISAR` on the wire); internally the
/// state set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EstadoExpediente {
    #[serde(rename = "REGISTRADO")]
    Registrado,
    #[serde(rename = "PARA REVISAR")]
    EnRevision,
    #[serde(rename = "APROBADO")]
    Aprobado,
    #[serde(rename = "RECHAZADO")]
    Rechazado,
    #[serde(rename = "CORREGIDO")]
    Corregido,
}

impl EstadoExpediente {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Registrado => "REGISTRADO",
            Self::EnRevision => "PARA REVISAR",
            Self::Aprobado => "APROBADO",
            Self::Rechazado => "RECHAZADO",
            Self::Corregido => "CORREGIDO",
        }
    }

    /// Parse a state submitted by an operator: trimmed and upper-cased
    /// before comparison, with both spellings of the review state
    /// accepted. Unknown states are a validation error.
    pub fn parse(raw: &str) -> CoreResult<Self> {
        let normalized = raw.trim().to_uppercase();
        match normalized.as_str() {
            "REGISTRADO" => Ok(Self::Registrado),
            "PARA REVISAR" | "EN_REVISION" | "EN REVISION" => Ok(Self::EnRevision),
            "APROBADO" => Ok(Self::Aprobado),
            "RECHAZADO" => Ok(Self::Rechazado),
            "CORREGIDO" => Ok(Self::Corregido),
            "" => Err(CoreError::validation("estado es requerido")),
            other => Err(CoreError::validation(format!(
                "estado desconocido: {other}"
            ))),
        }
    }

    /// Whether `self -> to` follows the review workflow:
    /// REGISTRADO -> PARA REVISAR -> {APROBADO, RECHAZADO};
    /// RECHAZADO -> CORREGIDO -> PARA REVISAR.
    ///
    /// Advisory only — operators may force other transitions (e.g.
    /// approving a previously rejected expediente directly), which the
    /// lifecycle manager logs but does not refuse.
    pub fn is_valid_transition(&self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Registrado, Self::EnRevision)
                | (Self::EnRevision, Self::Aprobado)
                | (Self::EnRevision, Self::Rechazado)
                | (Self::Rechazado, Self::Corregido)
                | (Self::Corregido, Self::EnRevision)
        )
    }
}

impl std::fmt::Display for EstadoExpediente {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expediente {
    pub id: Uuid,
    /// Unique case number, e.g. `EXP-001`.
    pub numero: String,
    pub descripcion: Option<String>,
    pub fecha_registro: DateTime<Utc>,
    /// The technician who registered the case.
    pub tecnico_id: Uuid,
    pub estado: EstadoExpediente,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateExpediente {
    pub numero: String,
    pub descripcion: Option<String>,
    pub fecha_registro: DateTime<Utc>,
    pub tecnico_id: Uuid,
}

/// Optional list filters; absence means no constraint on that field.
/// The date range is inclusive on the registration date.
#[derive(Debug, Clone, Default)]
pub struct ExpedienteFilter {
    pub estado: Option<EstadoExpediente>,
    pub fecha_inicio: Option<NaiveDate>,
    pub fecha_fin: Option<NaiveDate>,
}

/// Inclusive date range used by the rejected-cases view and the
/// summary report.
#[derive(Debug, Clone, Default)]
pub struct RangoFechas {
    pub fecha_inicio: Option<NaiveDate>,
    pub fecha_fin: Option<NaiveDate>,
}

/// One row of the estado summary report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumenEstado {
    pub estado: EstadoExpediente,
    pub total: u64,
}
