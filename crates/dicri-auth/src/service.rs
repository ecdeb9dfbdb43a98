//! Login orchestration: credential check, claim resolution, token
//! issuance.

use std::collections::BTreeSet;

use dicri_core::authz::Claims;
use dicri_core::error::{CoreError, CoreResult};
use dicri_core::repository::{RolRepository, UsuarioRepository};

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password;
use crate::token;

#[derive(Debug)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub struct LoginOutput {
    /// Signed JWT session token.
    pub token: String,
    /// The claims embedded in the token, for the response body.
    pub claims: Claims,
    /// Token lifetime in seconds.
    pub expires_in: u64,
}

/// Authentication service.
///
/// Generic over repository implementations so that this crate has no
/// dependency on the database crate.
pub struct AuthService<U: UsuarioRepository, R: RolRepository> {
    usuarios: U,
    roles: R,
    config: AuthConfig,
}

impl<U: UsuarioRepository, R: RolRepository> AuthService<U, R> {
    pub fn new(usuarios: U, roles: R, config: AuthConfig) -> Self {
        Self {
            usuarios,
            roles,
            config,
        }
    }

    /// Authenticate by email + password and issue a session token.
    ///
    /// Unknown email, missing/malformed hash, wrong password and
    /// inactive account all produce the same `Unauthorized` outcome.
    pub async fn login(&self, input: LoginInput) -> CoreResult<LoginOutput> {
        if input.email.trim().is_empty() || input.password.is_empty() {
            return Err(CoreError::validation("email y password son requeridos"));
        }

        let usuario = match self.usuarios.get_by_email(&input.email).await {
            Ok(u) => u,
            Err(CoreError::NotFound { .. }) => {
                return Err(AuthError::InvalidCredentials.into());
            }
            Err(e) => return Err(e),
        };

        if !usuario.activo {
            return Err(AuthError::InvalidCredentials.into());
        }

        let valid = password::verify_password(&input.password, &usuario.password_hash)
            .map_err(CoreError::from)?;
        if !valid {
            return Err(AuthError::InvalidCredentials.into());
        }

        // Flatten roles and the union of their permissions into the
        // claim set, once, at token-minting time.
        let roles = self.usuarios.get_roles(usuario.id).await?;
        let mut permisos = BTreeSet::new();
        for rol in &roles {
            for permiso in self.roles.get_permisos(rol.id).await? {
                permisos.insert(permiso.nombre);
            }
        }

        let claims = Claims {
            sub: usuario.id,
            email: usuario.email,
            nombre: usuario.nombre,
            roles: roles.into_iter().map(|r| r.nombre).collect(),
            permissions: permisos.into_iter().collect(),
        };

        let token = token::issue_session_token(&claims, &self.config).map_err(CoreError::from)?;

        Ok(LoginOutput {
            token,
            claims,
            expires_in: self.config.token_lifetime_secs,
        })
    }
}
