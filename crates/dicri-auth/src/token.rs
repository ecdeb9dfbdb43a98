//! JWT session token issuance and verification.
//!
//! Tokens carry the flat claim set assembled at login — roles and
//! permissions are never re-resolved per request.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use dicri_core::authz::Claims;

use crate::config::AuthConfig;
use crate::error::AuthError;

/// JWT claims embedded in every session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject — user ID (UUID string).
    pub sub: String,
    pub email: String,
    pub nombre: String,
    /// Flat role names, resolved at login.
    pub roles: Vec<String>,
    /// Flat permission names, the union over all assigned roles.
    pub permissions: Vec<String>,
    /// Issuer.
    pub iss: String,
    /// Issued-at (Unix timestamp).
    pub iat: i64,
    /// Expiration (Unix timestamp).
    pub exp: i64,
}

impl SessionClaims {
    /// Convert verified token claims back into the typed principal.
    pub fn into_claims(self) -> Result<Claims, AuthError> {
        let sub = Uuid::parse_str(&self.sub)
            .map_err(|e| AuthError::TokenInvalid(format!("bad subject: {e}")))?;
        Ok(Claims {
            sub,
            email: self.email,
            nombre: self.nombre,
            roles: self.roles,
            permissions: self.permissions,
        })
    }
}

/// Issue a signed HS256 session token for an authenticated principal.
pub fn issue_session_token(claims: &Claims, config: &AuthConfig) -> Result<String, AuthError> {
    let now = Utc::now().timestamp();
    let session = SessionClaims {
        sub: claims.sub.to_string(),
        email: claims.email.clone(),
        nombre: claims.nombre.clone(),
        roles: claims.roles.clone(),
        permissions: claims.permissions.clone(),
        iss: config.jwt_issuer.clone(),
        iat: now,
        exp: now + config.token_lifetime_secs as i64,
    };

    let key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
    jsonwebtoken::encode(&Header::new(Algorithm::HS256), &session, &key)
        .map_err(|e| AuthError::Crypto(format!("JWT encode: {e}")))
}

/// Decode and verify a session token (signature, expiry, issuer).
pub fn decode_session_token(
    token: &str,
    config: &AuthConfig,
) -> Result<SessionClaims, AuthError> {
    let key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&config.jwt_issuer]);
    validation.set_required_spec_claims(&["sub", "exp", "iat", "iss"]);

    jsonwebtoken::decode::<SessionClaims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::TokenInvalid(e.to_string()),
        })
}

/// Verify a session token and recover the typed principal.
///
/// Entry point for request-level authentication. Purely stateless —
/// no database lookup and no revocation check.
pub fn validate_session_token(token: &str, config: &AuthConfig) -> Result<Claims, AuthError> {
    decode_session_token(token, config)?.into_claims()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "un-secreto-de-prueba".into(),
            jwt_issuer: "dicri-test".into(),
            token_lifetime_secs: 28_800,
            bcrypt_cost: 4,
        }
    }

    fn test_claims() -> Claims {
        Claims {
            sub: Uuid::new_v4(),
            email: "coord@dicri.gob".into(),
            nombre: "Coordinadora".into(),
            roles: vec!["COORDINADOR".into()],
            permissions: vec!["EXPEDIENTES_APROBAR".into(), "EXPEDIENTES_VER".into()],
        }
    }

    #[test]
    fn token_round_trip_preserves_flat_claims() {
        let config = test_config();
        let claims = test_claims();

        let token = issue_session_token(&claims, &config).unwrap();
        let recovered = validate_session_token(&token, &config).unwrap();

        assert_eq!(recovered.sub, claims.sub);
        assert_eq!(recovered.email, claims.email);
        assert_eq!(recovered.roles, claims.roles);
        assert_eq!(recovered.permissions, claims.permissions);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let config = test_config();
        let token = issue_session_token(&test_claims(), &config).unwrap();

        let other = AuthConfig {
            jwt_secret: "otro-secreto".into(),
            ..test_config()
        };
        assert!(matches!(
            validate_session_token(&token, &other),
            Err(AuthError::TokenInvalid(_))
        ));
    }

    #[test]
    fn wrong_issuer_is_rejected() {
        let config = test_config();
        let token = issue_session_token(&test_claims(), &config).unwrap();

        let other = AuthConfig {
            jwt_issuer: "otro-emisor".into(),
            ..test_config()
        };
        assert!(matches!(
            validate_session_token(&token, &other),
            Err(AuthError::TokenInvalid(_))
        ));
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(matches!(
            validate_session_token("no.un.jwt", &test_config()),
            Err(AuthError::TokenInvalid(_))
        ));
    }
}
