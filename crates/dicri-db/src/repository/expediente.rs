//! SurrealDB implementation of [`ExpedienteRepository`].

use chrono::{DateTime, Days, NaiveDate, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use dicri_core::error::CoreResult;
use dicri_core::models::expediente::{
    CreateExpediente, EstadoExpediente, Expediente, ExpedienteFilter, RangoFechas, ResumenEstado,
};
use dicri_core::repository::ExpedienteRepository;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ExpedienteRow {
    numero: String,
    descripcion: Option<String>,
    fecha_registro: DateTime<Utc>,
    tecnico_id: String,
    estado: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct ExpedienteRowWithId {
    record_id: String,
    numero: String,
    descripcion: Option<String>,
    fecha_registro: DateTime<Utc>,
    tecnico_id: String,
    estado: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct ResumenRow {
    estado: String,
    total: u64,
}

fn parse_estado_column(raw: &str) -> Result<EstadoExpediente, DbError> {
    EstadoExpediente::parse(raw).map_err(|e| DbError::Decode(format!("invalid estado: {e}")))
}

fn expediente_from_row(id: Uuid, row: ExpedienteRow) -> Result<Expediente, DbError> {
    let tecnico_id = Uuid::parse_str(&row.tecnico_id)
        .map_err(|e| DbError::Decode(format!("invalid tecnico UUID: {e}")))?;
    Ok(Expediente {
        id,
        numero: row.numero,
        descripcion: row.descripcion,
        fecha_registro: row.fecha_registro,
        tecnico_id,
        estado: parse_estado_column(&row.estado)?,
        created_at: row.created_at,
    })
}

impl ExpedienteRowWithId {
    fn try_into_expediente(self) -> Result<Expediente, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        let tecnico_id = Uuid::parse_str(&self.tecnico_id)
            .map_err(|e| DbError::Decode(format!("invalid tecnico UUID: {e}")))?;
        Ok(Expediente {
            id,
            numero: self.numero,
            descripcion: self.descripcion,
            fecha_registro: self.fecha_registro,
            tecnico_id,
            estado: parse_estado_column(&self.estado)?,
            created_at: self.created_at,
        })
    }
}

/// Inclusive start of day in UTC for a date filter bound.
fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Exclusive end bound: midnight of the following day, so the filter
/// date itself is fully included. At the calendar's end there is no
/// following day; the bound clamps to the maximum timestamp, which
/// still covers the whole filter date.
fn end_of_day_exclusive(date: NaiveDate) -> DateTime<Utc> {
    match date.checked_add_days(Days::new(1)) {
        Some(next) => start_of_day(next),
        None => DateTime::<Utc>::MAX_UTC,
    }
}

/// SurrealDB implementation of the Expediente repository.
#[derive(Clone)]
pub struct SurrealExpedienteRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealExpedienteRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ExpedienteRepository for SurrealExpedienteRepository<C> {
    async fn create(&self, input: CreateExpediente) -> CoreResult<Expediente> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('expediente', $id) SET \
                 numero = $numero, descripcion = $descripcion, \
                 fecha_registro = $fecha_registro, \
                 tecnico_id = $tecnico_id, estado = $estado",
            )
            .bind(("id", id_str.clone()))
            .bind(("numero", input.numero))
            .bind(("descripcion", input.descripcion))
            .bind(("fecha_registro", input.fecha_registro))
            .bind(("tecnico_id", input.tecnico_id.to_string()))
            .bind(("estado", EstadoExpediente::Registrado.as_str()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_write("expediente", e))?;

        let rows: Vec<ExpedienteRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "expediente".into(),
            id: id_str,
        })?;

        Ok(expediente_from_row(id, row)?)
    }

    async fn get_by_id(&self, id: Uuid) -> CoreResult<Expediente> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('expediente', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ExpedienteRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "expediente".into(),
            id: id_str,
        })?;

        Ok(expediente_from_row(id, row)?)
    }

    async fn list(&self, filter: ExpedienteFilter) -> CoreResult<Vec<Expediente>> {
        let mut conditions = Vec::new();
        if filter.estado.is_some() {
            conditions.push("estado = $estado");
        }
        if filter.fecha_inicio.is_some() {
            conditions.push("fecha_registro >= $fecha_inicio");
        }
        if filter.fecha_fin.is_some() {
            conditions.push("fecha_registro < $fecha_fin");
        }

        let mut query = String::from("SELECT meta::id(id) AS record_id, * FROM expediente");
        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }
        query.push_str(" ORDER BY fecha_registro DESC");

        let mut builder = self.db.query(&query);
        if let Some(estado) = filter.estado {
            builder = builder.bind(("estado", estado.as_str()));
        }
        if let Some(inicio) = filter.fecha_inicio {
            builder = builder.bind(("fecha_inicio", start_of_day(inicio)));
        }
        if let Some(fin) = filter.fecha_fin {
            builder = builder.bind(("fecha_fin", end_of_day_exclusive(fin)));
        }

        let mut result = builder.await.map_err(DbError::from)?;
        let rows: Vec<ExpedienteRowWithId> = result.take(0).map_err(DbError::from)?;

        let expedientes = rows
            .into_iter()
            .map(|row| row.try_into_expediente())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(expedientes)
    }

    async fn update_estado(&self, id: Uuid, estado: EstadoExpediente) -> CoreResult<Expediente> {
        let id_str = id.to_string();

        let result = self
            .db
            .query("UPDATE type::record('expediente', $id) SET estado = $estado")
            .bind(("id", id_str.clone()))
            .bind(("estado", estado.as_str()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_write("expediente", e))?;

        let rows: Vec<ExpedienteRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "expediente".into(),
            id: id_str,
        })?;

        Ok(expediente_from_row(id, row)?)
    }

    async fn list_rechazados(&self, rango: RangoFechas) -> CoreResult<Vec<Expediente>> {
        let filter = ExpedienteFilter {
            estado: Some(EstadoExpediente::Rechazado),
            fecha_inicio: rango.fecha_inicio,
            fecha_fin: rango.fecha_fin,
        };
        self.list(filter).await
    }

    async fn resumen(&self, rango: RangoFechas) -> CoreResult<Vec<ResumenEstado>> {
        let mut conditions = Vec::new();
        if rango.fecha_inicio.is_some() {
            conditions.push("fecha_registro >= $fecha_inicio");
        }
        if rango.fecha_fin.is_some() {
            conditions.push("fecha_registro < $fecha_fin");
        }

        let mut query = String::from("SELECT estado, count() AS total FROM expediente");
        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }
        query.push_str(" GROUP BY estado ORDER BY estado ASC");

        let mut builder = self.db.query(&query);
        if let Some(inicio) = rango.fecha_inicio {
            builder = builder.bind(("fecha_inicio", start_of_day(inicio)));
        }
        if let Some(fin) = rango.fecha_fin {
            builder = builder.bind(("fecha_fin", end_of_day_exclusive(fin)));
        }

        let mut result = builder.await.map_err(DbError::from)?;
        let rows: Vec<ResumenRow> = result.take(0).map_err(DbError::from)?;

        let resumen = rows
            .into_iter()
            .map(|row| {
                Ok(ResumenEstado {
                    estado: parse_estado_column(&row.estado)?,
                    total: row.total,
                })
            })
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(resumen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_bounds_cover_the_whole_filter_date() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let inicio = start_of_day(date);
        let fin = end_of_day_exclusive(date);

        assert_eq!(inicio.to_rfc3339(), "2025-03-10T00:00:00+00:00");
        assert_eq!(fin.to_rfc3339(), "2025-03-11T00:00:00+00:00");

        let ultimo_instante = date.and_hms_opt(23, 59, 59).unwrap().and_utc();
        assert!(ultimo_instante >= inicio && ultimo_instante < fin);
    }

    #[test]
    fn end_bound_at_calendar_max_stays_inclusive() {
        let fin = end_of_day_exclusive(NaiveDate::MAX);
        assert_eq!(fin, DateTime::<Utc>::MAX_UTC);
        assert!(NaiveDate::MAX.and_time(chrono::NaiveTime::MIN).and_utc() < fin);
    }
}
