//! DICRI Auth — credential verification (bcrypt with legacy-prefix
//! normalization), JWT session tokens, the login flow, and role/
//! permission/user administration.

pub mod config;
pub mod directory;
pub mod error;
pub mod password;
pub mod service;
pub mod token;
pub mod users;

pub use config::AuthConfig;
pub use directory::DirectoryService;
pub use error::AuthError;
pub use service::{AuthService, LoginInput, LoginOutput};
pub use token::SessionClaims;
pub use users::UserAdminService;
