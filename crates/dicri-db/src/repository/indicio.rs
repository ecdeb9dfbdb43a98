//! SurrealDB implementation of [`IndicioRepository`].
//!
//! The fixed-point `peso` value crosses the persistence boundary as
//! its canonical string form so no precision is lost.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use dicri_core::error::CoreResult;
use dicri_core::models::indicio::{CreateIndicio, Indicio, UpdateIndicio};
use dicri_core::repository::IndicioRepository;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct IndicioRow {
    expediente_id: String,
    objeto: Option<String>,
    descripcion: String,
    color: Option<String>,
    tamano: Option<String>,
    peso: Option<String>,
    ubicacion: Option<String>,
    tecnico_id: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct IndicioRowWithId {
    record_id: String,
    expediente_id: String,
    objeto: Option<String>,
    descripcion: String,
    color: Option<String>,
    tamano: Option<String>,
    peso: Option<String>,
    ubicacion: Option<String>,
    tecnico_id: String,
    created_at: DateTime<Utc>,
}

fn decode_peso(raw: Option<String>) -> Result<Option<Decimal>, DbError> {
    raw.map(|s| {
        Decimal::from_str(&s).map_err(|e| DbError::Decode(format!("invalid peso: {e}")))
    })
    .transpose()
}

fn indicio_from_row(id: Uuid, row: IndicioRow) -> Result<Indicio, DbError> {
    let expediente_id = Uuid::parse_str(&row.expediente_id)
        .map_err(|e| DbError::Decode(format!("invalid expediente UUID: {e}")))?;
    let tecnico_id = Uuid::parse_str(&row.tecnico_id)
        .map_err(|e| DbError::Decode(format!("invalid tecnico UUID: {e}")))?;
    Ok(Indicio {
        id,
        expediente_id,
        objeto: row.objeto,
        descripcion: row.descripcion,
        color: row.color,
        tamano: row.tamano,
        peso: decode_peso(row.peso)?,
        ubicacion: row.ubicacion,
        tecnico_id,
        created_at: row.created_at,
    })
}

impl IndicioRowWithId {
    fn try_into_indicio(self) -> Result<Indicio, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        let row = IndicioRow {
            expediente_id: self.expediente_id,
            objeto: self.objeto,
            descripcion: self.descripcion,
            color: self.color,
            tamano: self.tamano,
            peso: self.peso,
            ubicacion: self.ubicacion,
            tecnico_id: self.tecnico_id,
            created_at: self.created_at,
        };
        indicio_from_row(id, row)
    }
}

/// SurrealDB implementation of the Indicio repository.
#[derive(Clone)]
pub struct SurrealIndicioRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealIndicioRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> IndicioRepository for SurrealIndicioRepository<C> {
    async fn create(&self, input: CreateIndicio) -> CoreResult<Indicio> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('indicio', $id) SET \
                 expediente_id = $expediente_id, objeto = $objeto, \
                 descripcion = $descripcion, color = $color, \
                 tamano = $tamano, peso = $peso, \
                 ubicacion = $ubicacion, tecnico_id = $tecnico_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("expediente_id", input.expediente_id.to_string()))
            .bind(("objeto", input.objeto))
            .bind(("descripcion", input.descripcion))
            .bind(("color", input.color))
            .bind(("tamano", input.tamano))
            .bind(("peso", input.peso.map(|p| p.to_string())))
            .bind(("ubicacion", input.ubicacion))
            .bind(("tecnico_id", input.tecnico_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_write("indicio", e))?;

        let rows: Vec<IndicioRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "indicio".into(),
            id: id_str,
        })?;

        Ok(indicio_from_row(id, row)?)
    }

    async fn get_by_id(&self, id: Uuid) -> CoreResult<Indicio> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('indicio', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<IndicioRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "indicio".into(),
            id: id_str,
        })?;

        Ok(indicio_from_row(id, row)?)
    }

    async fn update(&self, id: Uuid, input: UpdateIndicio) -> CoreResult<Indicio> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.objeto.is_some() {
            sets.push("objeto = $objeto");
        }
        if input.descripcion.is_some() {
            sets.push("descripcion = $descripcion");
        }
        if input.color.is_some() {
            sets.push("color = $color");
        }
        if input.tamano.is_some() {
            sets.push("tamano = $tamano");
        }
        if input.peso.is_some() {
            sets.push("peso = $peso");
        }
        if input.ubicacion.is_some() {
            sets.push("ubicacion = $ubicacion");
        }
        if sets.is_empty() {
            return self.get_by_id(id).await;
        }

        let query = format!(
            "UPDATE type::record('indicio', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));
        if let Some(objeto) = input.objeto {
            builder = builder.bind(("objeto", objeto));
        }
        if let Some(descripcion) = input.descripcion {
            builder = builder.bind(("descripcion", descripcion));
        }
        if let Some(color) = input.color {
            builder = builder.bind(("color", color));
        }
        if let Some(tamano) = input.tamano {
            builder = builder.bind(("tamano", tamano));
        }
        if let Some(peso) = input.peso {
            builder = builder.bind(("peso", peso.to_string()));
        }
        if let Some(ubicacion) = input.ubicacion {
            builder = builder.bind(("ubicacion", ubicacion));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::from_write("indicio", e))?;

        let rows: Vec<IndicioRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "indicio".into(),
            id: id_str,
        })?;

        Ok(indicio_from_row(id, row)?)
    }

    async fn delete(&self, id: Uuid) -> CoreResult<()> {
        self.db
            .query("DELETE type::record('indicio', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list_by_expediente(&self, expediente_id: Uuid) -> CoreResult<Vec<Indicio>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM indicio \
                 WHERE expediente_id = $expediente_id \
                 ORDER BY created_at ASC",
            )
            .bind(("expediente_id", expediente_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<IndicioRowWithId> = result.take(0).map_err(DbError::from)?;

        let indicios = rows
            .into_iter()
            .map(|row| row.try_into_indicio())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(indicios)
    }
}
