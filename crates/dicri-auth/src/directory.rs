//! Role-permission directory: CRUD on roles and permissions plus
//! their links to each other and to users.

use std::collections::BTreeSet;

use uuid::Uuid;

use dicri_core::error::{CoreError, CoreResult};
use dicri_core::models::permiso::{CreatePermiso, Permiso, UpdatePermiso};
use dicri_core::models::rol::{CreateRol, Rol, UpdateRol};
use dicri_core::repository::{PermisoRepository, RolRepository, UsuarioRepository};

/// Directory of roles, permissions and their assignments.
///
/// Deletion cascades: removing a role or permission also removes its
/// join edges, so no orphaned edge is ever readable as a valid grant.
pub struct DirectoryService<U, R, P>
where
    U: UsuarioRepository,
    R: RolRepository,
    P: PermisoRepository,
{
    usuarios: U,
    roles: R,
    permisos: P,
}

impl<U, R, P> DirectoryService<U, R, P>
where
    U: UsuarioRepository,
    R: RolRepository,
    P: PermisoRepository,
{
    pub fn new(usuarios: U, roles: R, permisos: P) -> Self {
        Self {
            usuarios,
            roles,
            permisos,
        }
    }

    // -- Roles --------------------------------------------------------

    pub async fn create_rol(&self, nombre: &str) -> CoreResult<Rol> {
        let nombre = nombre.trim();
        if nombre.is_empty() {
            return Err(CoreError::validation("nombre es requerido"));
        }
        self.roles
            .create(CreateRol {
                nombre: nombre.to_string(),
            })
            .await
    }

    pub async fn list_roles(&self) -> CoreResult<Vec<Rol>> {
        self.roles.list().await
    }

    pub async fn get_rol(&self, id: Uuid) -> CoreResult<Rol> {
        self.roles.get_by_id(id).await
    }

    pub async fn update_rol(&self, id: Uuid, nombre: &str) -> CoreResult<Rol> {
        let nombre = nombre.trim();
        if nombre.is_empty() {
            return Err(CoreError::validation("nombre es requerido"));
        }
        self.roles
            .update(
                id,
                UpdateRol {
                    nombre: Some(nombre.to_string()),
                },
            )
            .await
    }

    pub async fn delete_rol(&self, id: Uuid) -> CoreResult<()> {
        self.roles.delete(id).await
    }

    // -- Permisos -----------------------------------------------------

    pub async fn create_permiso(&self, nombre: &str) -> CoreResult<Permiso> {
        let nombre = nombre.trim();
        if nombre.is_empty() {
            return Err(CoreError::validation("nombre es requerido"));
        }
        self.permisos
            .create(CreatePermiso {
                nombre: nombre.to_string(),
            })
            .await
    }

    pub async fn list_permisos(&self) -> CoreResult<Vec<Permiso>> {
        self.permisos.list().await
    }

    pub async fn get_permiso(&self, id: Uuid) -> CoreResult<Permiso> {
        self.permisos.get_by_id(id).await
    }

    pub async fn update_permiso(&self, id: Uuid, nombre: &str) -> CoreResult<Permiso> {
        let nombre = nombre.trim();
        if nombre.is_empty() {
            return Err(CoreError::validation("nombre es requerido"));
        }
        self.permisos
            .update(
                id,
                UpdatePermiso {
                    nombre: Some(nombre.to_string()),
                },
            )
            .await
    }

    pub async fn delete_permiso(&self, id: Uuid) -> CoreResult<()> {
        self.permisos.delete(id).await
    }

    // -- Permiso <-> Rol ----------------------------------------------

    pub async fn rol_permisos(&self, rol_id: Uuid) -> CoreResult<Vec<Permiso>> {
        self.roles.get_permisos(rol_id).await
    }

    /// Grant a permission to a role. Both sides must exist.
    pub async fn grant_permiso(&self, rol_id: Uuid, permiso_id: Uuid) -> CoreResult<()> {
        self.roles.get_by_id(rol_id).await?;
        self.permisos.get_by_id(permiso_id).await?;
        self.roles.grant_permiso(rol_id, permiso_id).await
    }

    /// Idempotent: revoking an absent grant succeeds.
    pub async fn revoke_permiso(&self, rol_id: Uuid, permiso_id: Uuid) -> CoreResult<()> {
        self.roles.revoke_permiso(rol_id, permiso_id).await
    }

    // -- Rol <-> Usuario ----------------------------------------------

    pub async fn user_roles(&self, usuario_id: Uuid) -> CoreResult<Vec<Rol>> {
        self.usuarios.get_roles(usuario_id).await
    }

    /// Assign a role to a user. Both sides must exist.
    pub async fn assign_rol(&self, usuario_id: Uuid, rol_id: Uuid) -> CoreResult<()> {
        self.usuarios.get_by_id(usuario_id).await?;
        self.roles.get_by_id(rol_id).await?;
        self.usuarios.assign_rol(usuario_id, rol_id).await
    }

    /// Idempotent: removing an absent assignment succeeds.
    pub async fn remove_rol(&self, usuario_id: Uuid, rol_id: Uuid) -> CoreResult<()> {
        self.usuarios.remove_rol(usuario_id, rol_id).await
    }

    /// The union of permission names granted transitively through all
    /// of the user's roles — the flat set the login flow embeds into
    /// session claims.
    pub async fn resolve_permisos(&self, usuario_id: Uuid) -> CoreResult<BTreeSet<String>> {
        let mut permisos = BTreeSet::new();
        for rol in self.usuarios.get_roles(usuario_id).await? {
            for permiso in self.roles.get_permisos(rol.id).await? {
                permisos.insert(permiso.nombre);
            }
        }
        Ok(permisos)
    }
}
