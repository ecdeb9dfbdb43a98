//! User administration: account CRUD and password updates.

use uuid::Uuid;

use dicri_core::error::{CoreError, CoreResult};
use dicri_core::models::usuario::{CreateUsuario, UpdateUsuario, Usuario};
use dicri_core::repository::UsuarioRepository;

use crate::config::AuthConfig;
use crate::password;

/// Input for creating a user account. The password arrives raw and is
/// hashed with the configured cost before it reaches the repository.
#[derive(Debug)]
pub struct CreateUsuarioInput {
    pub nombre: String,
    pub email: String,
    pub password: String,
    pub activo: bool,
}

pub struct UserAdminService<U: UsuarioRepository> {
    usuarios: U,
    config: AuthConfig,
}

impl<U: UsuarioRepository> UserAdminService<U> {
    pub fn new(usuarios: U, config: AuthConfig) -> Self {
        Self { usuarios, config }
    }

    pub async fn list(&self) -> CoreResult<Vec<Usuario>> {
        self.usuarios.list().await
    }

    pub async fn get(&self, id: Uuid) -> CoreResult<Usuario> {
        self.usuarios.get_by_id(id).await
    }

    /// Create a user. Duplicate email surfaces as `Conflict`.
    pub async fn create(&self, input: CreateUsuarioInput) -> CoreResult<Usuario> {
        if input.nombre.trim().is_empty()
            || input.email.trim().is_empty()
            || input.password.is_empty()
        {
            return Err(CoreError::validation(
                "nombre, email y password son requeridos",
            ));
        }

        let password_hash = password::hash_password(&input.password, self.config.bcrypt_cost)
            .map_err(CoreError::from)?;

        self.usuarios
            .create(CreateUsuario {
                nombre: input.nombre.trim().to_string(),
                email: input.email.trim().to_string(),
                password_hash,
                activo: input.activo,
            })
            .await
    }

    pub async fn update(&self, id: Uuid, input: UpdateUsuario) -> CoreResult<Usuario> {
        self.usuarios.update(id, input).await
    }

    /// Re-hash and store a new password.
    pub async fn update_password(&self, id: Uuid, new_password: &str) -> CoreResult<()> {
        if new_password.is_empty() {
            return Err(CoreError::validation("password es requerido"));
        }
        let password_hash = password::hash_password(new_password, self.config.bcrypt_cost)
            .map_err(CoreError::from)?;
        self.usuarios.update_password(id, password_hash).await
    }

    /// Hard removal; role assignments go with the account.
    pub async fn delete(&self, id: Uuid) -> CoreResult<()> {
        self.usuarios.delete(id).await
    }
}
