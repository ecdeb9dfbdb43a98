//! Authorization evaluator.
//!
//! Claims are resolved once at login and passed by value through the
//! call chain; [`can_access`] never fetches roles or permissions
//! itself and must run synchronously before any mutating operation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authenticated principal: identity plus the flat role and
/// permission names embedded in the session token at login time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub nombre: String,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
}

impl Claims {
    pub fn has_role(&self, rol: &str) -> bool {
        self.roles.iter().any(|r| r == rol)
    }

    pub fn has_permission(&self, permiso: &str) -> bool {
        self.permissions.iter().any(|p| p == permiso)
    }
}

/// Decide whether a principal may perform an action.
///
/// - No verified identity: always denied.
/// - Non-empty `required_roles`: the principal must hold at least one
///   of them (OR semantics).
/// - Non-empty `required_permissions`: the principal must hold all of
///   them (AND semantics).
/// - Both requirement sets empty: authentication alone suffices.
pub fn can_access(
    principal: Option<&Claims>,
    required_roles: &[&str],
    required_permissions: &[&str],
) -> bool {
    let Some(claims) = principal else {
        return false;
    };

    if !required_roles.is_empty() && !required_roles.iter().any(|r| claims.has_role(r)) {
        return false;
    }

    if !required_permissions.is_empty()
        && !required_permissions.iter().all(|p| claims.has_permission(p))
    {
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn claims(roles: &[&str], permissions: &[&str]) -> Claims {
        Claims {
            sub: Uuid::new_v4(),
            email: "tecnico@dicri.gob".into(),
            nombre: "Técnico de turno".into(),
            roles: roles.iter().map(|s| s.to_string()).collect(),
            permissions: permissions.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn anonymous_is_always_denied() {
        assert!(!can_access(None, &[], &[]));
        assert!(!can_access(None, &["TECNICO"], &[]));
    }

    #[test]
    fn empty_requirements_grant_any_authenticated_principal() {
        assert!(can_access(Some(&claims(&[], &[])), &[], &[]));
    }

    #[test]
    fn one_matching_role_suffices() {
        let c = claims(&["TECNICO"], &[]);
        assert!(can_access(Some(&c), &["TECNICO", "COORDINADOR"], &[]));
        assert!(!can_access(Some(&c), &["COORDINADOR"], &[]));
    }

    #[test]
    fn all_permissions_are_required() {
        let c = claims(&[], &["EXPEDIENTES_VER", "EXPEDIENTES_APROBAR"]);
        assert!(can_access(
            Some(&c),
            &[],
            &["EXPEDIENTES_VER", "EXPEDIENTES_APROBAR"]
        ));
        assert!(!can_access(
            Some(&c),
            &[],
            &["EXPEDIENTES_VER", "USUARIOS_ADMIN"]
        ));
    }

    #[test]
    fn roles_and_permissions_are_checked_together() {
        let c = claims(&["COORDINADOR"], &["EXPEDIENTES_APROBAR"]);
        assert!(can_access(
            Some(&c),
            &["COORDINADOR"],
            &["EXPEDIENTES_APROBAR"]
        ));
        assert!(!can_access(Some(&c), &["TECNICO"], &["EXPEDIENTES_APROBAR"]));
        assert!(!can_access(Some(&c), &["COORDINADOR"], &["USUARIOS_ADMIN"]));
    }

    fn name_set() -> impl Strategy<Value = Vec<String>> {
        proptest::collection::vec("[A-E]", 0..5).prop_map(|v| {
            let mut v = v;
            v.sort();
            v.dedup();
            v
        })
    }

    proptest! {
        /// OR over roles, AND over permissions, empty means no
        /// constraint.
        #[test]
        fn decision_matches_set_semantics(
            held_roles in name_set(),
            held_perms in name_set(),
            req_roles in name_set(),
            req_perms in name_set(),
        ) {
            let c = Claims {
                sub: Uuid::new_v4(),
                email: "p@dicri.gob".into(),
                nombre: "P".into(),
                roles: held_roles.clone(),
                permissions: held_perms.clone(),
            };
            let req_roles_ref: Vec<&str> =
                req_roles.iter().map(String::as_str).collect();
            let req_perms_ref: Vec<&str> =
                req_perms.iter().map(String::as_str).collect();

            let expected = (req_roles.is_empty()
                || req_roles.iter().any(|r| held_roles.contains(r)))
                && (req_perms.is_empty()
                    || req_perms.iter().all(|p| held_perms.contains(p)));

            prop_assert_eq!(
                can_access(Some(&c), &req_roles_ref, &req_perms_ref),
                expected
            );
        }
    }
}
