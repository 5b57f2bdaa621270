use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Closed set of roles. Stored by name in the `roles` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    User,
    StoreOwner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Role must be ADMIN, USER, or STORE_OWNER")]
pub struct InvalidUserRole;

// ============================================================================
// Allow-lists
// ============================================================================

pub const ADMIN_ONLY: &[UserRole] = &[UserRole::Admin];
pub const USER_ONLY: &[UserRole] = &[UserRole::User];
pub const STORE_OWNER_ONLY: &[UserRole] = &[UserRole::StoreOwner];
pub const ADMIN_OR_STORE_OWNER: &[UserRole] = &[UserRole::Admin, UserRole::StoreOwner];

impl UserRole {
    pub const ALL: [UserRole; 3] = [UserRole::Admin, UserRole::User, UserRole::StoreOwner];

    #[inline]
    pub const fn code(&self) -> &'static str {
        use UserRole::*;
        match self {
            Admin => "ADMIN",
            User => "USER",
            StoreOwner => "STORE_OWNER",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.code() == code)
    }

    #[inline]
    pub fn is_in(&self, allowed: &[UserRole]) -> bool {
        allowed.contains(self)
    }
}

impl FromStr for UserRole {
    type Err = InvalidUserRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or(InvalidUserRole)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_from_code() {
        assert_eq!(UserRole::from_code("ADMIN"), Some(UserRole::Admin));
        assert_eq!(UserRole::from_code("USER"), Some(UserRole::User));
        assert_eq!(UserRole::from_code("STORE_OWNER"), Some(UserRole::StoreOwner));
        assert_eq!(UserRole::from_code("admin"), None);
        assert_eq!("OWNER".parse::<UserRole>(), Err(InvalidUserRole));
    }

    #[test]
    fn test_serde_uses_codes() {
        assert_eq!(
            serde_json::to_string(&UserRole::StoreOwner).unwrap(),
            "\"STORE_OWNER\""
        );
        let role: UserRole = serde_json::from_str("\"ADMIN\"").unwrap();
        assert_eq!(role, UserRole::Admin);
    }

    #[test]
    fn test_allow_lists() {
        assert!(UserRole::Admin.is_in(ADMIN_OR_STORE_OWNER));
        assert!(UserRole::StoreOwner.is_in(ADMIN_OR_STORE_OWNER));
        assert!(!UserRole::User.is_in(ADMIN_OR_STORE_OWNER));
        assert!(!UserRole::Admin.is_in(USER_ONLY));
    }
}
