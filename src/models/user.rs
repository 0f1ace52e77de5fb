use serde::{Deserialize, Serialize};

use super::role::Role;

pub type UserId = i64;

/// Read-only snapshot of a backend user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub roles: Vec<Role>,
}

impl User {
    /// True if any role carries `tag`, regardless of its scope.
    pub fn has_role(&self, tag: &str) -> bool {
        self.roles.iter().any(|r| r.tag() == tag)
    }

    /// Roles formatted for the Role column, e.g. `admin, franchisee(1)`.
    pub fn role_labels(&self) -> String {
        self.roles
            .iter()
            .map(|r| r.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Optional-caller form of [`User::has_role`]; an anonymous caller holds no roles.
pub fn has_role(user: Option<&User>, tag: &str) -> bool {
    user.is_some_and(|u| u.has_role(tag))
}

/// One page of `GET /api/user`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserListPage {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub more: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::role::{ADMIN, FRANCHISEE};

    fn user_with(roles: Vec<Role>) -> User {
        User { id: 1, name: "Pat".into(), email: "pat@jwt.com".into(), roles }
    }

    #[test]
    fn has_role_ignores_scope() {
        let user = user_with(vec![Role::scoped(FRANCHISEE, "4")]);
        assert!(user.has_role(FRANCHISEE));
        assert!(!user.has_role(ADMIN));
    }

    #[test]
    fn anonymous_caller_has_no_roles() {
        assert!(!has_role(None, ADMIN));
        let admin = user_with(vec![Role::unscoped(ADMIN)]);
        assert!(has_role(Some(&admin), ADMIN));
    }

    #[test]
    fn role_labels_join_in_order() {
        let user = user_with(vec![Role::unscoped(ADMIN), Role::scoped(FRANCHISEE, "1")]);
        assert_eq!(user.role_labels(), "admin, franchisee(1)");
    }

    #[test]
    fn page_tolerates_missing_fields() {
        let page: UserListPage =
            serde_json::from_str(r#"{"users":[{"id":3,"name":"Gamma"}]}"#).unwrap();
        assert_eq!(page.users.len(), 1);
        assert!(page.users[0].roles.is_empty());
        assert!(!page.more);
    }
}
