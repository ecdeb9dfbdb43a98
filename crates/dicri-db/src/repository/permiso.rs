//! SurrealDB implementation of [`PermisoRepository`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use dicri_core::error::CoreResult;
use dicri_core::models::permiso::{CreatePermiso, Permiso, UpdatePermiso};
use dicri_core::repository::PermisoRepository;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct PermisoRow {
    nombre: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
pub(crate) struct PermisoRowWithId {
    pub(crate) record_id: String,
    nombre: String,
    created_at: DateTime<Utc>,
}

impl PermisoRowWithId {
    pub(crate) fn try_into_permiso(self) -> Result<Permiso, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        Ok(Permiso {
            id,
            nombre: self.nombre,
            created_at: self.created_at,
        })
    }
}

/// SurrealDB implementation of the Permiso repository.
#[derive(Clone)]
pub struct SurrealPermisoRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealPermisoRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> PermisoRepository for SurrealPermisoRepository<C> {
    async fn create(&self, input: CreatePermiso) -> CoreResult<Permiso> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query("CREATE type::record('permiso', $id) SET nombre = $nombre")
            .bind(("id", id_str.clone()))
            .bind(("nombre", input.nombre))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_write("permiso", e))?;

        let rows: Vec<PermisoRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "permiso".into(),
            id: id_str,
        })?;

        Ok(Permiso {
            id,
            nombre: row.nombre,
            created_at: row.created_at,
        })
    }

    async fn get_by_id(&self, id: Uuid) -> CoreResult<Permiso> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('permiso', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PermisoRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "permiso".into(),
            id: id_str,
        })?;

        Ok(Permiso {
            id,
            nombre: row.nombre,
            created_at: row.created_at,
        })
    }

    async fn update(&self, id: Uuid, input: UpdatePermiso) -> CoreResult<Permiso> {
        let id_str = id.to_string();

        let Some(nombre) = input.nombre else {
            return self.get_by_id(id).await;
        };

        let result = self
            .db
            .query("UPDATE type::record('permiso', $id) SET nombre = $nombre")
            .bind(("id", id_str.clone()))
            .bind(("nombre", nombre))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_write("permiso", e))?;

        let rows: Vec<PermisoRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "permiso".into(),
            id: id_str,
        })?;

        Ok(Permiso {
            id,
            nombre: row.nombre,
            created_at: row.created_at,
        })
    }

    async fn delete(&self, id: Uuid) -> CoreResult<()> {
        let id_str = id.to_string();

        // Remove grant edges together with the permission.
        let query = format!(
            "DELETE otorga WHERE out = permiso:`{id_str}`; \
             DELETE type::record('permiso', $id);"
        );

        self.db
            .query(query)
            .bind(("id", id_str))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(&self) -> CoreResult<Vec<Permiso>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM permiso \
                 ORDER BY nombre ASC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PermisoRowWithId> = result.take(0).map_err(DbError::from)?;

        let permisos = rows
            .into_iter()
            .map(|row| row.try_into_permiso())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(permisos)
    }
}
