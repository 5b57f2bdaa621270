//! User Entity
//!
//! Core user profile. The password hash only travels inside
//! [`UserCredentials`] and is never serialised.

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use kernel::rating::AverageRating;
use platform::password::HashedPassword;

use crate::domain::value_object::{
    address::Address, email::Email, user_name::UserName, user_role::UserRole,
};

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub address: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    #[inline]
    pub fn is_store_owner(&self) -> bool {
        self.role == UserRole::StoreOwner
    }
}

/// User with the stored password hash, for credential checks
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password: HashedPassword,
}

/// Fields for a new user row
#[derive(Debug)]
pub struct NewUser {
    pub name: UserName,
    pub email: Email,
    pub password: HashedPassword,
    pub address: Address,
    pub role_id: i32,
}

/// Partial update; `None` leaves the column untouched
#[derive(Debug, Default)]
pub struct UserChanges {
    pub name: Option<UserName>,
    pub email: Option<Email>,
    pub address: Option<Address>,
    pub role_id: Option<i32>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.address.is_none() && self.role_id.is_none()
    }
}

/// Row of the admin user listing
#[derive(Debug, Clone)]
pub struct UserSummary {
    pub user: User,
    /// Average rating of the owned store; only set for store owners
    pub ranking: Option<AverageRating>,
}

/// Listing filters: substring match on text, exact match on role
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub role: Option<UserRole>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_changes() {
        assert!(UserChanges::default().is_empty());
        let changes = UserChanges {
            role_id: Some(2),
            ..Default::default()
        };
        assert!(!changes.is_empty());
    }
}
