//! DICRI Core — domain models, error taxonomy, repository traits, and
//! the authorization evaluator shared across all crates.

pub mod authz;
pub mod error;
pub mod models;
pub mod repository;

pub use authz::{Claims, can_access};
pub use error::{CoreError, CoreResult};
