//! Verified identity and role-based authorization.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use caregate_core::models::role::Role;

/// The verified identity extracted from a valid session token.
///
/// Downstream handlers receive exactly these three claims and must not
/// assume any other is present.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub account_id: Uuid,
    pub username: String,
    pub roles: Vec<Role>,
}

impl Principal {
    /// True iff the principal holds at least one of `required`.
    ///
    /// A `false` result means the caller must answer with an
    /// authorization error, distinct from a failed authentication.
    pub fn has_any_role(&self, required: &[Role]) -> bool {
        required.iter().any(|r| self.roles.contains(r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(roles: Vec<Role>) -> Principal {
        Principal {
            account_id: Uuid::new_v4(),
            username: "alice".into(),
            roles,
        }
    }

    #[test]
    fn overlapping_roles_authorize() {
        let p = principal(vec![Role::Patient]);
        assert!(p.has_any_role(&[Role::Patient]));
        assert!(p.has_any_role(&[Role::Admin, Role::Patient]));
    }

    #[test]
    fn disjoint_roles_do_not_authorize() {
        let p = principal(vec![Role::Patient]);
        assert!(!p.has_any_role(&[Role::Admin]));
        assert!(!p.has_any_role(&[Role::Admin, Role::Physician]));
    }

    #[test]
    fn empty_requirement_never_authorizes() {
        let p = principal(vec![Role::Admin]);
        assert!(!p.has_any_role(&[]));
    }

    #[test]
    fn multi_role_principal() {
        let p = principal(vec![Role::Physician, Role::Admin]);
        assert!(p.has_any_role(&[Role::Admin]));
        assert!(p.has_any_role(&[Role::Physician]));
        assert!(!p.has_any_role(&[Role::Patient]));
    }
}
