//! User roles and the role-set check used by the RBAC middleware.
//!
//! Role names must match the `CHECK` constraint on `users.role` in
//! `20260101000001_create_users.sql`.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const ROLE_USER: &str = "USER";
pub const ROLE_MODERATOR: &str = "MODERATOR";
pub const ROLE_ADMIN: &str = "ADMIN";

/// Role assigned to a user account. New accounts start as [`UserRole::User`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    User,
    Moderator,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => ROLE_USER,
            Self::Moderator => ROLE_MODERATOR,
            Self::Admin => ROLE_ADMIN,
        }
    }

    /// Parse a role from its stored (upper-case) name.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            ROLE_USER => Ok(Self::User),
            ROLE_MODERATOR => Ok(Self::Moderator),
            ROLE_ADMIN => Ok(Self::Admin),
            _ => Err(CoreError::Validation(format!(
                "Invalid role '{s}'. Must be one of: {ROLE_USER}, {ROLE_MODERATOR}, {ROLE_ADMIN}"
            ))),
        }
    }
}

impl TryFrom<String> for UserRole {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether `role` satisfies a route's declared role set.
///
/// An empty set means the route is open to any authenticated user.
pub fn role_permitted(required: &[UserRole], role: UserRole) -> bool {
    required.is_empty() || required.contains(&role)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_every_role() {
        for role in [UserRole::User, UserRole::Moderator, UserRole::Admin] {
            assert_eq!(UserRole::parse(role.as_str()).unwrap(), role);
        }
    }

    #[test]
    fn parse_rejects_lowercase() {
        assert!(UserRole::parse("admin").is_err());
        assert!(UserRole::parse("").is_err());
    }

    #[test]
    fn empty_role_set_is_open() {
        assert!(role_permitted(&[], UserRole::User));
    }

    #[test]
    fn role_set_requires_membership() {
        let admin_only = [UserRole::Admin];
        assert!(role_permitted(&admin_only, UserRole::Admin));
        assert!(!role_permitted(&admin_only, UserRole::Moderator));
        assert!(!role_permitted(&admin_only, UserRole::User));
    }

    #[test]
    fn serde_uses_upper_case_names() {
        let json = serde_json::to_string(&UserRole::Moderator).unwrap();
        assert_eq!(json, "\"MODERATOR\"");
        let parsed: UserRole = serde_json::from_str("\"ADMIN\"").unwrap();
        assert_eq!(parsed, UserRole::Admin);
    }
}
