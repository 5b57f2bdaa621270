//! User Administration Use Cases
//!
//! ADMIN-only listing, lookup, creation, update and deletion of accounts.

use std::sync::Arc;

use kernel::id::UserId;
use kernel::pagination::{Page, PageRequest};
use kernel::rating::AverageRating;
use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::{NewUser, User, UserChanges, UserFilter, UserSummary};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    address::Address, email::Email, user_name::UserName, user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

/// A user plus, for store owners, the average rating of their store
#[derive(Debug, Clone)]
pub struct UserDetail {
    pub user: User,
    pub rating: Option<AverageRating>,
}

/// Admin create input (already validated)
#[derive(Debug)]
pub struct CreateUserInput {
    pub name: UserName,
    pub email: Email,
    pub password: ClearTextPassword,
    pub address: Address,
    pub role: UserRole,
}

/// Admin update input; absent fields are left unchanged
#[derive(Debug, Default)]
pub struct UpdateUserInput {
    pub name: Option<UserName>,
    pub email: Option<Email>,
    pub address: Option<Address>,
    pub role: Option<UserRole>,
}

/// User administration use cases
pub struct ManageUsersUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> ManageUsersUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn list(&self, filter: UserFilter, page: PageRequest) -> AuthResult<Page<UserSummary>> {
        self.user_repo.list(&filter, page).await
    }

    pub async fn get(&self, id: UserId) -> AuthResult<UserDetail> {
        let user = self
            .user_repo
            .find_by_id(id)
            .await?
            .ok_or(AuthError::UserNotFound)?;
        self.detail(user).await
    }

    pub async fn create(&self, input: CreateUserInput) -> AuthResult<User> {
        if self.user_repo.exists_by_email(&input.email).await? {
            return Err(AuthError::EmailTaken);
        }

        let password = input.password.hash_async(self.config.bcrypt_cost).await?;

        let role_id = self
            .user_repo
            .role_id(input.role)
            .await?
            .ok_or(AuthError::InvalidRole)?;

        let id = self
            .user_repo
            .create(&NewUser {
                name: input.name,
                email: input.email,
                password,
                address: input.address,
                role_id,
            })
            .await?;

        let user = self
            .user_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AuthError::Internal(format!("user {id} missing after insert")))?;

        tracing::info!(user_id = %user.id, role = %user.role, "User created by admin");

        Ok(user)
    }

    pub async fn update(&self, id: UserId, input: UpdateUserInput) -> AuthResult<UserDetail> {
        let current = self
            .user_repo
            .find_by_id(id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if let Some(role) = input.role {
            let demoted = match (current.role, role) {
                (UserRole::StoreOwner, UserRole::StoreOwner) => false,
                (UserRole::StoreOwner, UserRole::Admin | UserRole::User) => true,
                (UserRole::Admin | UserRole::User, _) => false,
            };
            if demoted && self.user_repo.owns_store(id).await? {
                return Err(AuthError::OwnerHasStore);
            }
        }

        let role_id = match input.role {
            Some(role) => Some(
                self.user_repo
                    .role_id(role)
                    .await?
                    .ok_or(AuthError::InvalidRole)?,
            ),
            None => None,
        };

        let changes = UserChanges {
            name: input.name,
            email: input.email,
            address: input.address,
            role_id,
        };
        self.user_repo.update(id, &changes).await?;

        let user = self
            .user_repo
            .find_by_id(id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        tracing::info!(user_id = %id, "User updated by admin");

        self.detail(user).await
    }

    pub async fn delete(&self, id: UserId) -> AuthResult<()> {
        if !self.user_repo.delete(id).await? {
            return Err(AuthError::UserNotFound);
        }
        tracing::info!(user_id = %id, "User deleted by admin");
        Ok(())
    }

    async fn detail(&self, user: User) -> AuthResult<UserDetail> {
        let rating = match user.role {
            UserRole::StoreOwner => Some(self.user_repo.owned_store_rating(user.id).await?),
            UserRole::Admin | UserRole::User => None,
        };
        Ok(UserDetail { user, rating })
    }
}
