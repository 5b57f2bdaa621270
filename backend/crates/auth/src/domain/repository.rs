//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::UserId;
use kernel::pagination::{Page, PageRequest};
use kernel::rating::AverageRating;
use platform::password::HashedPassword;

use crate::domain::entity::user::{
    NewUser, User, UserChanges, UserCredentials, UserFilter, UserSummary,
};
use crate::domain::value_object::{email::Email, user_role::UserRole};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Find user by ID
    async fn find_by_id(&self, id: UserId) -> AuthResult<Option<User>>;

    /// Find user and password hash by email
    async fn find_credentials_by_email(&self, email: &Email)
    -> AuthResult<Option<UserCredentials>>;

    /// Find user and password hash by ID
    async fn find_credentials_by_id(&self, id: UserId) -> AuthResult<Option<UserCredentials>>;

    /// Check if email exists
    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    /// Resolve a role to its `roles` row id
    async fn role_id(&self, role: UserRole) -> AuthResult<Option<i32>>;

    /// Insert a user and return its generated id
    async fn create(&self, user: &NewUser) -> AuthResult<UserId>;

    /// Apply a partial update, bumping `updated_at`
    async fn update(&self, id: UserId, changes: &UserChanges) -> AuthResult<()>;

    /// Replace the password hash
    async fn update_password(&self, id: UserId, password: &HashedPassword) -> AuthResult<()>;

    /// Delete a user; returns whether a row was removed
    async fn delete(&self, id: UserId) -> AuthResult<bool>;

    /// Filtered, paginated listing with store-owner ranking
    async fn list(&self, filter: &UserFilter, page: PageRequest) -> AuthResult<Page<UserSummary>>;

    /// Whether any store names `owner` as its owner
    async fn owns_store(&self, owner: UserId) -> AuthResult<bool>;

    /// Average rating across the stores owned by `owner`
    async fn owned_store_rating(&self, owner: UserId) -> AuthResult<AverageRating>;

    /// Total number of users
    async fn count(&self) -> AuthResult<i64>;
}
