//! Domain models for the DICRI case-management core.
//!
//! These are the plain data types shared across all crates.

pub mod expediente;
pub mod indicio;
pub mod permiso;
pub mod rechazo;
pub mod rol;
pub mod usuario;
