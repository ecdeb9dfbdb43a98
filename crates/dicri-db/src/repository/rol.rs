//! SurrealDB implementation of [`RolRepository`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use dicri_core::error::CoreResult;
use dicri_core::models::permiso::Permiso;
use dicri_core::models::rol::{CreateRol, Rol, UpdateRol};
use dicri_core::repository::RolRepository;

use crate::error::DbError;
use crate::repository::permiso::PermisoRowWithId;

#[derive(Debug, SurrealValue)]
struct RolRow {
    nombre: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
pub(crate) struct RolRowWithId {
    pub(crate) record_id: String,
    nombre: String,
    created_at: DateTime<Utc>,
}

impl RolRowWithId {
    pub(crate) fn try_into_rol(self) -> Result<Rol, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        Ok(Rol {
            id,
            nombre: self.nombre,
            created_at: self.created_at,
        })
    }
}

/// SurrealDB implementation of the Rol repository.
#[derive(Clone)]
pub struct SurrealRolRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealRolRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> RolRepository for SurrealRolRepository<C> {
    async fn create(&self, input: CreateRol) -> CoreResult<Rol> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query("CREATE type::record('rol', $id) SET nombre = $nombre")
            .bind(("id", id_str.clone()))
            .bind(("nombre", input.nombre))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| DbError::from_write("rol", e))?;

        let rows: Vec<RolRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "rol".into(),
            id: id_str,
        })?;

        Ok(Rol {
            id,
            nombre: row.nombre,
            created_at: row.created_at,
        })
    }

    async fn get_by_id(&self, id: Uuid) -> CoreResult<Rol> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('rol', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RolRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "rol".into(),
            id: id_str,
        })?;

        Ok(Rol {
            id,
            nombre: row.nombre,
            created_at: row.created_at,
        })
    }

    async fn update(&self, id: Uuid, input: UpdateRol) -> CoreResult<Rol> {
        let id_str = id.to_string();

        let Some(nombre) = input.nombre else {
            return self.get_by_id(id).await;
        };

        let result = self
            .db
            .query("UPDATE type::record('rol', $id) SET nombre = $nombre")
            .bind(("id", id_str.clone()))
            .bind(("nombre", nombre))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| DbError::from_write("rol", e))?;

        let rows: Vec<RolRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "rol".into(),
            id: id_str,
        })?;

        Ok(Rol {
            id,
            nombre: row.nombre,
            created_at: row.created_at,
        })
    }

    async fn delete(&self, id: Uuid) -> CoreResult<()> {
        let id_str = id.to_string();

        // Remove assignment and grant edges together with the role.
        let query = format!(
            "DELETE tiene_rol WHERE out = rol:`{id_str}`; \
             DELETE otorga WHERE in = rol:`{id_str}`; \
             DELETE type::record('rol', $id);"
        );

        self.db
            .query(query)
            .bind(("id", id_str))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(&self) -> CoreResult<Vec<Rol>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM rol \
                 ORDER BY nombre ASC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RolRowWithId> = result.take(0).map_err(DbError::from)?;

        let roles = rows
            .into_iter()
            .map(|row| row.try_into_rol())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(roles)
    }

    async fn get_permisos(&self, id: Uuid) -> CoreResult<Vec<Permiso>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM permiso \
                 WHERE id IN (\
                     SELECT VALUE out FROM otorga \
                     WHERE in = type::record('rol', $rol_id)\
                 )",
            )
            .bind(("rol_id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PermisoRowWithId> = result.take(0).map_err(DbError::from)?;

        // Deduplicate by record_id in case a grant was relayed twice.
        let mut seen = std::collections::HashSet::new();
        let mut permisos = Vec::new();
        for row in rows {
            if seen.insert(row.record_id.clone()) {
                permisos.push(row.try_into_permiso()?);
            }
        }

        Ok(permisos)
    }

    async fn grant_permiso(&self, id: Uuid, permiso_id: Uuid) -> CoreResult<()> {
        let rol_id_str = id.to_string();
        let permiso_id_str = permiso_id.to_string();

        let query = format!("RELATE rol:`{rol_id_str}` -> otorga -> permiso:`{permiso_id_str}`;");

        self.db.query(query).await.map_err(DbError::from)?;

        Ok(())
    }

    async fn revoke_permiso(&self, id: Uuid, permiso_id: Uuid) -> CoreResult<()> {
        self.db
            .query(
                "DELETE otorga WHERE \
                 in = type::record('rol', $rol_id) AND \
                 out = type::record('permiso', $permiso_id)",
            )
            .bind(("rol_id", id.to_string()))
            .bind(("permiso_id", permiso_id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }
}
