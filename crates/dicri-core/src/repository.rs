//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. The core never constructs raw
//! query text — these traits are the "execute named operation with
//! named parameters" capability the persistence crate implements.

use uuid::Uuid;

use crate::error::CoreResult;
use crate::models::{
    expediente::{
        CreateExpediente, EstadoExpediente, Expediente, ExpedienteFilter, RangoFechas,
        ResumenEstado,
    },
    indicio::{CreateIndicio, Indicio, UpdateIndicio},
    permiso::{CreatePermiso, Permiso, UpdatePermiso},
    rechazo::{CreateRechazo, Rechazo},
    rol::{CreateRol, Rol, UpdateRol},
    usuario::{CreateUsuario, UpdateUsuario, Usuario},
};

pub trait UsuarioRepository: Send + Sync {
    fn create(&self, input: CreateUsuario) -> impl Future<Output = CoreResult<Usuario>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = CoreResult<Usuario>> + Send;
    fn get_by_email(&self, email: &str) -> impl Future<Output = CoreResult<Usuario>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateUsuario,
    ) -> impl Future<Output = CoreResult<Usuario>> + Send;
    fn update_password(
        &self,
        id: Uuid,
        password_hash: String,
    ) -> impl Future<Output = CoreResult<()>> + Send;
    /// Hard removal; role assignments are deleted with the user.
    fn delete(&self, id: Uuid) -> impl Future<Output = CoreResult<()>> + Send;
    fn list(&self) -> impl Future<Output = CoreResult<Vec<Usuario>>> + Send;

    fn get_roles(&self, id: Uuid) -> impl Future<Output = CoreResult<Vec<Rol>>> + Send;
    fn assign_rol(&self, id: Uuid, rol_id: Uuid) -> impl Future<Output = CoreResult<()>> + Send;
    /// Idempotent: removing an absent assignment is not an error.
    fn remove_rol(&self, id: Uuid, rol_id: Uuid) -> impl Future<Output = CoreResult<()>> + Send;
}

pub trait RolRepository: Send + Sync {
    fn create(&self, input: CreateRol) -> impl Future<Output = CoreResult<Rol>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = CoreResult<Rol>> + Send;
    fn update(&self, id: Uuid, input: UpdateRol) -> impl Future<Output = CoreResult<Rol>> + Send;
    /// Cascades: assignment and grant edges are removed with the role.
    fn delete(&self, id: Uuid) -> impl Future<Output = CoreResult<()>> + Send;
    fn list(&self) -> impl Future<Output = CoreResult<Vec<Rol>>> + Send;

    fn get_permisos(&self, id: Uuid) -> impl Future<Output = CoreResult<Vec<Permiso>>> + Send;
    fn grant_permiso(
        &self,
        id: Uuid,
        permiso_id: Uuid,
    ) -> impl Future<Output = CoreResult<()>> + Send;
    /// Idempotent: revoking an absent grant is not an error.
    fn revoke_permiso(
        &self,
        id: Uuid,
        permiso_id: Uuid,
    ) -> impl Future<Output = CoreResult<()>> + Send;
}

pub trait PermisoRepository: Send + Sync {
    fn create(&self, input: CreatePermiso) -> impl Future<Output = CoreResult<Permiso>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = CoreResult<Permiso>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdatePermiso,
    ) -> impl Future<Output = CoreResult<Permiso>> + Send;
    /// Cascades: grant edges are removed with the permission.
    fn delete(&self, id: Uuid) -> impl Future<Output = CoreResult<()>> + Send;
    fn list(&self) -> impl Future<Output = CoreResult<Vec<Permiso>>> + Send;
}

pub trait ExpedienteRepository: Send + Sync {
    fn create(
        &self,
        input: CreateExpediente,
    ) -> impl Future<Output = CoreResult<Expediente>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = CoreResult<Expediente>> + Send;
    fn list(
        &self,
        filter: ExpedienteFilter,
    ) -> impl Future<Output = CoreResult<Vec<Expediente>>> + Send;
    fn update_estado(
        &self,
        id: Uuid,
        estado: EstadoExpediente,
    ) -> impl Future<Output = CoreResult<Expediente>> + Send;
    fn list_rechazados(
        &self,
        rango: RangoFechas,
    ) -> impl Future<Output = CoreResult<Vec<Expediente>>> + Send;
    /// Expediente counts grouped by estado.
    fn resumen(
        &self,
        rango: RangoFechas,
    ) -> impl Future<Output = CoreResult<Vec<ResumenEstado>>> + Send;
}

pub trait RechazoRepository: Send + Sync {
    /// Append a rejection event. No update or delete operations exist.
    fn append(&self, input: CreateRechazo) -> impl Future<Output = CoreResult<Rechazo>> + Send;
    /// Full history for one expediente, newest first.
    fn list_by_expediente(
        &self,
        expediente_id: Uuid,
    ) -> impl Future<Output = CoreResult<Vec<Rechazo>>> + Send;
}

pub trait IndicioRepository: Send + Sync {
    fn create(&self, input: CreateIndicio) -> impl Future<Output = CoreResult<Indicio>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = CoreResult<Indicio>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateIndicio,
    ) -> impl Future<Output = CoreResult<Indicio>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = CoreResult<()>> + Send;
    fn list_by_expediente(
        &self,
        expediente_id: Uuid,
    ) -> impl Future<Output = CoreResult<Vec<Indicio>>> + Send;
}
