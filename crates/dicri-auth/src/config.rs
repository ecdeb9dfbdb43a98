//! Authentication configuration.

/// Configuration for credential verification and session tokens.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Shared secret for HS256 JWT signing and verification.
    pub jwt_secret: String,
    /// JWT issuer (`iss` claim).
    pub jwt_issuer: String,
    /// Session token lifetime in seconds (default: 28_800 = 8 hours).
    pub token_lifetime_secs: u64,
    /// Default bcrypt work factor when the caller does not supply one.
    pub bcrypt_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            jwt_issuer: "dicri".into(),
            token_lifetime_secs: 28_800,
            bcrypt_cost: 10,
        }
    }
}
