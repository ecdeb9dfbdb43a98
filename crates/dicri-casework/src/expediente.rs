//! Expediente lifecycle manager.
//!
//! Validates state changes, enforces the RECHAZADO-requires-
//! justification rule, and keeps the append-only rejection history.

use tracing::warn;
use uuid::Uuid;

use dicri_core::error::{CoreError, CoreResult};
use dicri_core::models::expediente::{
    CreateExpediente, EstadoExpediente, Expediente, ExpedienteFilter, RangoFechas, ResumenEstado,
};
use dicri_core::models::rechazo::{CreateRechazo, Rechazo};
use dicri_core::repository::{ExpedienteRepository, RechazoRepository};

pub struct ExpedienteService<E: ExpedienteRepository, R: RechazoRepository> {
    expedientes: E,
    rechazos: R,
}

impl<E: ExpedienteRepository, R: RechazoRepository> ExpedienteService<E, R> {
    pub fn new(expedientes: E, rechazos: R) -> Self {
        Self {
            expedientes,
            rechazos,
        }
    }

    /// Register a new expediente in state REGISTRADO. `numero` is
    /// mandatory; a duplicate numero is a `Conflict`.
    pub async fn create(&self, input: CreateExpediente) -> CoreResult<Expediente> {
        if input.numero.trim().is_empty() {
            return Err(CoreError::validation("numero y fechaRegistro son requeridos"));
        }
        self.expedientes
            .create(CreateExpediente {
                numero: input.numero.trim().to_string(),
                ..input
            })
            .await
    }

    pub async fn get(&self, id: Uuid) -> CoreResult<Expediente> {
        self.expedientes.get_by_id(id).await
    }

    pub async fn list(&self, filter: ExpedienteFilter) -> CoreResult<Vec<Expediente>> {
        self.expedientes.list(filter).await
    }

    /// Set the state of an expediente.
    ///
    /// The raw state is trimmed and upper-cased before comparison.
    /// RECHAZADO requires a non-blank justification and appends one
    /// Rechazo record — repeated rejections grow the history; no
    /// other target state touches it.
    pub async fn set_state(
        &self,
        id: Uuid,
        raw_estado: &str,
        acting_user_id: Uuid,
        justificacion: Option<&str>,
    ) -> CoreResult<Expediente> {
        let nuevo = EstadoExpediente::parse(raw_estado)?;
        let actual = self.expedientes.get_by_id(id).await?;

        let justificacion = justificacion.map(str::trim).unwrap_or("");
        if nuevo == EstadoExpediente::Rechazado && justificacion.is_empty() {
            return Err(CoreError::validation(
                "justificacion requerida para RECHAZADO",
            ));
        }

        if !actual.estado.is_valid_transition(nuevo) {
            warn!(
                expediente = %id,
                desde = actual.estado.as_str(),
                hacia = nuevo.as_str(),
                "transición fuera del flujo de revisión"
            );
        }

        let actualizado = self.expedientes.update_estado(id, nuevo).await?;

        if nuevo == EstadoExpediente::Rechazado {
            self.rechazos
                .append(CreateRechazo {
                    expediente_id: id,
                    usuario_id: acting_user_id,
                    justificacion: justificacion.to_string(),
                })
                .await?;
        }

        Ok(actualizado)
    }

    pub async fn approve(&self, id: Uuid, acting_user_id: Uuid) -> CoreResult<Expediente> {
        self.set_state(id, "APROBADO", acting_user_id, None).await
    }

    pub async fn reject(
        &self,
        id: Uuid,
        acting_user_id: Uuid,
        justificacion: &str,
    ) -> CoreResult<Expediente> {
        self.set_state(id, "RECHAZADO", acting_user_id, Some(justificacion))
            .await
    }

    /// Read-only view of expedientes currently RECHAZADO.
    pub async fn list_rejected(&self, rango: RangoFechas) -> CoreResult<Vec<Expediente>> {
        self.expedientes.list_rechazados(rango).await
    }

    /// Full rejection history for one expediente, newest first.
    pub async fn rejection_history(&self, id: Uuid) -> CoreResult<Vec<Rechazo>> {
        self.rechazos.list_by_expediente(id).await
    }

    /// Expediente counts grouped by estado.
    pub async fn resumen(&self, rango: RangoFechas) -> CoreResult<Vec<ResumenEstado>> {
        self.expedientes.resumen(rango).await
    }
}
