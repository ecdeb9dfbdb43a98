//! SurrealDB repository implementations.

mod expediente;
mod indicio;
mod permiso;
mod rechazo;
mod rol;
mod usuario;

pub use expediente::SurrealExpedienteRepository;
pub use indicio::SurrealIndicioRepository;
pub use permiso::SurrealPermisoRepository;
pub use rechazo::SurrealRechazoRepository;
pub use rol::SurrealRolRepository;
pub use usuario::SurrealUsuarioRepository;
