//! Register Use Case
//!
//! Creates a new USER account and signs a token pair for it.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::application::tokens::{TokenPair, issue_pair};
use crate::domain::entity::user::{NewUser, User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    address::Address, email::Email, user_name::UserName, user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

/// Register input (already validated)
#[derive(Debug)]
pub struct RegisterInput {
    pub name: UserName,
    pub email: Email,
    pub password: ClearTextPassword,
    pub address: Address,
}

/// Signed-in user with tokens; shared by register and login
pub struct AuthOutput {
    pub user: User,
    pub tokens: TokenPair,
}

/// Register use case
pub struct RegisterUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> RegisterUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<AuthOutput> {
        // Duplicate check first so a failure never pays for hashing
        if self.user_repo.exists_by_email(&input.email).await? {
            return Err(AuthError::EmailTaken);
        }

        let password = input.password.hash_async(self.config.bcrypt_cost).await?;

        let role_id = self
            .user_repo
            .role_id(UserRole::User)
            .await?
            .ok_or(AuthError::RoleConfiguration)?;

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

        let tokens = issue_pair(&self.config, &user)?;

        tracing::info!(user_id = %user.id, "User registered");

        Ok(AuthOutput { user, tokens })
    }
}
