//! SurrealDB implementation of [`RechazoRepository`].
//!
//! The rechazo table is append-only. The schema denies update and
//! delete at the table level, so the repository exposes neither.

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use dicri_core::error::CoreResult;
use dicri_core::models::rechazo::{CreateRechazo, Rechazo};
use dicri_core::repository::RechazoRepository;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct RechazoRow {
    expediente_id: String,
    usuario_id: String,
    justificacion: String,
    fecha: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct RechazoRowWithId {
    record_id: String,
    expediente_id: String,
    usuario_id: String,
    justificacion: String,
    fecha: DateTime<Utc>,
}

impl RechazoRowWithId {
    fn try_into_rechazo(self) -> Result<Rechazo, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        let expediente_id = Uuid::parse_str(&self.expediente_id)
            .map_err(|e| DbError::Decode(format!("invalid expediente UUID: {e}")))?;
        let usuario_id = Uuid::parse_str(&self.usuario_id)
            .map_err(|e| DbError::Decode(format!("invalid usuario UUID: {e}")))?;
        Ok(Rechazo {
            id,
            expediente_id,
            usuario_id,
            justificacion: self.justificacion,
            fecha: self.fecha,
        })
    }
}

/// SurrealDB implementation of the Rechazo repository.
#[derive(Clone)]
pub struct SurrealRechazoRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealRechazoRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> RechazoRepository for SurrealRechazoRepository<C> {
    async fn append(&self, input: CreateRechazo) -> CoreResult<Rechazo> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('rechazo', $id) SET \
                 expediente_id = $expediente_id, \
                 usuario_id = $usuario_id, \
                 justificacion = $justificacion",
            )
            .bind(("id", id_str.clone()))
            .bind(("expediente_id", input.expediente_id.to_string()))
            .bind(("usuario_id", input.usuario_id.to_string()))
            .bind(("justificacion", input.justificacion))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_write("rechazo", e))?;

        let rows: Vec<RechazoRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "rechazo".into(),
            id: id_str,
        })?;

        let expediente_id = Uuid::parse_str(&row.expediente_id)
            .map_err(|e| DbError::Decode(format!("invalid expediente UUID: {e}")))?;
        let usuario_id = Uuid::parse_str(&row.usuario_id)
            .map_err(|e| DbError::Decode(format!("invalid usuario UUID: {e}")))?;

        Ok(Rechazo {
            id,
            expediente_id,
            usuario_id,
            justificacion: row.justificacion,
            fecha: row.fecha,
        })
    }

    async fn list_by_expediente(&self, expediente_id: Uuid) -> CoreResult<Vec<Rechazo>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM rechazo \
                 WHERE expediente_id = $expediente_id \
                 ORDER BY fecha DESC",
            )
            .bind(("expediente_id", expediente_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RechazoRowWithId> = result.take(0).map_err(DbError::from)?;

        let rechazos = rows
            .into_iter()
            .map(|row| row.try_into_rechazo())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(rechazos)
    }
}
