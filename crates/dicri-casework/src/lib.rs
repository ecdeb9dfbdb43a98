//! DICRI Casework — expediente lifecycle management and the indicio
//! registry, generic over the core repository traits.

pub mod expediente;
pub mod indicio;

pub use expediente::ExpedienteService;
pub use indicio::IndicioService;
