//! Indicio registry: evidence CRUD scoped to a parent expediente.
//!
//! The registry depends on the lifecycle manager's data only for
//! existence checks — indicio mutation is not blocked by the parent's
//! state.

use uuid::Uuid;

use dicri_core::error::{CoreError, CoreResult};
use dicri_core::models::indicio::{CreateIndicio, Indicio, UpdateIndicio};
use dicri_core::repository::{ExpedienteRepository, IndicioRepository};

pub struct IndicioService<I: IndicioRepository, E: ExpedienteRepository> {
    indicios: I,
    expedientes: E,
}

impl<I: IndicioRepository, E: ExpedienteRepository> IndicioService<I, E> {
    pub fn new(indicios: I, expedientes: E) -> Self {
        Self {
            indicios,
            expedientes,
        }
    }

    /// Register an indicio under an existing expediente. `descripcion`
    /// is mandatory; `peso` is kept at 2 fraction digits.
    pub async fn create(&self, input: CreateIndicio) -> CoreResult<Indicio> {
        if input.descripcion.trim().is_empty() {
            return Err(CoreError::validation(
                "expedienteId y descripcion son requeridos",
            ));
        }
        self.expedientes.get_by_id(input.expediente_id).await?;

        self.indicios
            .create(CreateIndicio {
                descripcion: input.descripcion.trim().to_string(),
                peso: input.peso.map(|p| p.round_dp(2)),
                ..input
            })
            .await
    }

    pub async fn get(&self, id: Uuid) -> CoreResult<Indicio> {
        self.indicios.get_by_id(id).await
    }

    /// Partial update: omitted fields retain their previous value.
    pub async fn update(&self, id: Uuid, input: UpdateIndicio) -> CoreResult<Indicio> {
        if let Some(descripcion) = &input.descripcion {
            if descripcion.trim().is_empty() {
                return Err(CoreError::validation("descripcion no puede quedar vacía"));
            }
        }
        self.indicios
            .update(
                id,
                UpdateIndicio {
                    peso: input.peso.map(|p| p.round_dp(2)),
                    ..input
                },
            )
            .await
    }

    /// Existence is checked before deletion, not inferred from the
    /// affected-row count.
    pub async fn remove(&self, id: Uuid) -> CoreResult<()> {
        self.indicios.get_by_id(id).await?;
        self.indicios.delete(id).await
    }

    pub async fn list_by_expediente(&self, expediente_id: Uuid) -> CoreResult<Vec<Indicio>> {
        self.indicios.list_by_expediente(expediente_id).await
    }
}
