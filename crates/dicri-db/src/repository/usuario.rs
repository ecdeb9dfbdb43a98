//! SurrealDB implementation of [`UsuarioRepository`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use dicri_core::error::CoreResult;
use dicri_core::models::rol::Rol;
use dicri_core::models::usuario::{CreateUsuario, UpdateUsuario, Usuario};
use dicri_core::repository::UsuarioRepository;

use crate::error::DbError;
use crate::repository::rol::RolRowWithId;

#[derive(Debug, SurrealValue)]
struct UsuarioRow {
    nombre: String,
    email: String,
    password_hash: String,
    activo: bool,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct UsuarioRowWithId {
    record_id: String,
    nombre: String,
    email: String,
    password_hash: String,
    activo: bool,
    created_at: DateTime<Utc>,
}

impl UsuarioRowWithId {
    fn try_into_usuario(self) -> Result<Usuario, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        Ok(Usuario {
            id,
            nombre: self.nombre,
            email: self.email,
            password_hash: self.password_hash,
            activo: self.activo,
            created_at: self.created_at,
        })
    }
}

fn usuario_from_row(id: Uuid, row: UsuarioRow) -> Usuario {
    Usuario {
        id,
        nombre: row.nombre,
        email: row.email,
        password_hash: row.password_hash,
        activo: row.activo,
        created_at: row.created_at,
    }
}

/// SurrealDB implementation of the Usuario repository.
#[derive(Clone)]
pub struct SurrealUsuarioRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealUsuarioRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> UsuarioRepository for SurrealUsuarioRepository<C> {
    async fn create(&self, input: CreateUsuario) -> CoreResult<Usuario> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('usuario', $id) SET \
                 nombre = $nombre, email = $email, \
                 password_hash = $password_hash, activo = $activo",
            )
            .bind(("id", id_str.clone()))
            .bind(("nombre", input.nombre))
            .bind(("email", input.email))
            .bind(("password_hash", input.password_hash))
            .bind(("activo", input.activo))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_write("usuario", e))?;

        let rows: Vec<UsuarioRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "usuario".into(),
            id: id_str,
        })?;

        Ok(usuario_from_row(id, row))
    }

    async fn get_by_id(&self, id: Uuid) -> CoreResult<Usuario> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('usuario', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UsuarioRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "usuario".into(),
            id: id_str,
        })?;

        Ok(usuario_from_row(id, row))
    }

    async fn get_by_email(&self, email: &str) -> CoreResult<Usuario> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM usuario \
                 WHERE email = $email",
            )
            .bind(("email", email.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UsuarioRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "usuario".into(),
            id: email.to_string(),
        })?;

        Ok(row.try_into_usuario()?)
    }

    async fn update(&self, id: Uuid, input: UpdateUsuario) -> CoreResult<Usuario> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.nombre.is_some() {
            sets.push("nombre = $nombre");
        }
        if input.email.is_some() {
            sets.push("email = $email");
        }
        if input.activo.is_some() {
            sets.push("activo = $activo");
        }
        if sets.is_empty() {
            return self.get_by_id(id).await;
        }

        let query = format!(
            "UPDATE type::record('usuario', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));
        if let Some(nombre) = input.nombre {
            builder = builder.bind(("nombre", nombre));
        }
        if let Some(email) = input.email {
            builder = builder.bind(("email", email));
        }
        if let Some(activo) = input.activo {
            builder = builder.bind(("activo", activo));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::from_write("usuario", e))?;

        let rows: Vec<UsuarioRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "usuario".into(),
            id: id_str,
        })?;

        Ok(usuario_from_row(id, row))
    }

    async fn update_password(&self, id: Uuid, password_hash: String) -> CoreResult<()> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "UPDATE type::record('usuario', $id) SET \
                 password_hash = $password_hash",
            )
            .bind(("id", id_str.clone()))
            .bind(("password_hash", password_hash))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UsuarioRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "usuario".into(),
                id: id_str,
            }
            .into());
        }

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> CoreResult<()> {
        let id_str = id.to_string();

        // Delete role-assignment edges first, then the record.
        let query = format!(
            "DELETE tiene_rol WHERE in = usuario:`{id_str}`; \
             DELETE type::record('usuario', $id);"
        );

        self.db
            .query(query)
            .bind(("id", id_str))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(&self) -> CoreResult<Vec<Usuario>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM usuario \
                 ORDER BY created_at ASC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UsuarioRowWithId> = result.take(0).map_err(DbError::from)?;

        let usuarios = rows
            .into_iter()
            .map(|row| row.try_into_usuario())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(usuarios)
    }

    async fn get_roles(&self, id: Uuid) -> CoreResult<Vec<Rol>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM rol \
                 WHERE id IN (\
                     SELECT VALUE out FROM tiene_rol \
                     WHERE in = type::record('usuario', $usuario_id)\
                 )",
            )
            .bind(("usuario_id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RolRowWithId> = result.take(0).map_err(DbError::from)?;

        // Deduplicate by record_id: repeated assignments must not
        // yield repeated roles.
        let mut seen = std::collections::HashSet::new();
        let mut roles = Vec::new();
        for row in rows {
            if seen.insert(row.record_id.clone()) {
                roles.push(row.try_into_rol()?);
            }
        }

        Ok(roles)
    }

    async fn assign_rol(&self, id: Uuid, rol_id: Uuid) -> CoreResult<()> {
        let usuario_id_str = id.to_string();
        let rol_id_str = rol_id.to_string();

        let query = format!("RELATE usuario:`{usuario_id_str}` -> tiene_rol -> rol:`{rol_id_str}`;");

        self.db.query(query).await.map_err(DbError::from)?;

        Ok(())
    }

    async fn remove_rol(&self, id: Uuid, rol_id: Uuid) -> CoreResult<()> {
        self.db
            .query(
                "DELETE tiene_rol WHERE \
                 in = type::record('usuario', $usuario_id) AND \
                 out = type::record('rol', $rol_id)",
            )
            .bind(("usuario_id", id.to_string()))
            .bind(("rol_id", rol_id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }
}
