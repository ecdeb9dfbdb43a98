//! Password verification and hashing using bcrypt.
//!
//! Stored hashes may carry the `$2y$` prefix used by another
//! originating ecosystem (PHP imports); `$2y$` and `$2b$` identify the
//! same algorithm and the remainder of the hash is byte-identical, so
//! normalization is a pure prefix rewrite preceding a single
//! verification path.

use std::borrow::Cow;

use crate::error::AuthError;

/// Minimum accepted bcrypt work factor.
pub const MIN_COST: u32 = 4;
/// Maximum accepted bcrypt work factor.
pub const MAX_COST: u32 = 15;

/// Textual prefix tag for freshly generated hashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashPrefix {
    /// `$2b$`, what this system stores.
    Canonical,
    /// `$2y$`, emitted only for interoperability tooling.
    Legacy,
}

/// Rewrite a legacy `$2y$` prefix to the canonical `$2b$`. Anything
/// else passes through unchanged.
pub fn normalize_hash(hash: &str) -> Cow<'_, str> {
    match hash.strip_prefix("$2y$") {
        Some(rest) => Cow::Owned(format!("$2b${rest}")),
        None => Cow::Borrowed(hash),
    }
}

/// Verify a plaintext password against a stored bcrypt hash.
///
/// An empty or malformed stored hash verifies as `false`, not as a
/// distinct error — indistinguishable from a wrong password.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AuthError> {
    if stored_hash.is_empty() {
        return Ok(false);
    }
    let normalized = normalize_hash(stored_hash);
    match bcrypt::verify(password, &normalized) {
        Ok(valid) => Ok(valid),
        Err(_) => Ok(false),
    }
}

/// Hash a password with the given work factor, producing a `$2b$`
/// hash. The cost must lie in `[MIN_COST, MAX_COST]`.
pub fn hash_password(password: &str, cost: u32) -> Result<String, AuthError> {
    if password.is_empty() {
        return Err(AuthError::InvalidInput("password es requerido".into()));
    }
    if !(MIN_COST..=MAX_COST).contains(&cost) {
        return Err(AuthError::InvalidInput(format!(
            "el coste bcrypt debe estar entre {MIN_COST} y {MAX_COST}"
        )));
    }
    bcrypt::hash(password, cost).map_err(|e| AuthError::Crypto(e.to_string()))
}

/// Hash a password and tag the output with the requested prefix.
///
/// Re-tagging is cosmetic: a `$2y$`-tagged hash verifies identically
/// after normalization.
pub fn hash_password_with_prefix(
    password: &str,
    cost: u32,
    prefix: HashPrefix,
) -> Result<String, AuthError> {
    let hash = hash_password(password, cost)?;
    Ok(match prefix {
        HashPrefix::Canonical => hash,
        HashPrefix::Legacy => match hash.strip_prefix("$2b$") {
            Some(rest) => format!("$2y${rest}"),
            None => hash,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_password_matches() {
        let hash = hash_password("hunter2", 4).unwrap();
        assert!(verify_password("hunter2", &hash).unwrap());
    }

    #[test]
    fn wrong_password_does_not_match() {
        let hash = hash_password("hunter2", 4).unwrap();
        assert!(!verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn round_trip_across_valid_costs() {
        for cost in [MIN_COST, 6, 8] {
            let hash = hash_password("secreta", cost).unwrap();
            assert!(verify_password("secreta", &hash).unwrap());
            assert!(!verify_password("otra", &hash).unwrap());
        }
    }

    #[test]
    fn legacy_prefix_verifies_identically() {
        let canonical = hash_password("secreta", 4).unwrap();
        assert!(canonical.starts_with("$2b$"));

        let legacy = format!("$2y${}", &canonical[4..]);
        assert!(verify_password("secreta", &legacy).unwrap());
        assert!(!verify_password("otra", &legacy).unwrap());
    }

    #[test]
    fn legacy_tagged_output_is_prefix_only_rewrite() {
        let legacy = hash_password_with_prefix("secreta", 4, HashPrefix::Legacy).unwrap();
        assert!(legacy.starts_with("$2y$"));
        assert!(verify_password("secreta", &legacy).unwrap());
    }

    #[test]
    fn normalize_leaves_canonical_untouched() {
        assert_eq!(normalize_hash("$2b$10$abc"), "$2b$10$abc");
        assert_eq!(normalize_hash("$2y$10$abc"), "$2b$10$abc");
        assert_eq!(normalize_hash("not-a-hash"), "not-a-hash");
    }

    #[test]
    fn cost_out_of_range_is_invalid_input() {
        assert!(matches!(
            hash_password("secreta", 3),
            Err(AuthError::InvalidInput(_))
        ));
        assert!(matches!(
            hash_password("secreta", 16),
            Err(AuthError::InvalidInput(_))
        ));
    }

    #[test]
    fn empty_password_is_invalid_input() {
        assert!(matches!(
            hash_password("", 10),
            Err(AuthError::InvalidInput(_))
        ));
    }

    #[test]
    fn missing_or_malformed_stored_hash_fails_closed() {
        assert!(!verify_password("secreta", "").unwrap());
        assert!(!verify_password("secreta", "garbage").unwrap());
    }
}
