//! Change Password Use Case

use std::sync::Arc;

use kernel::id::UserId;
use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

/// Change password input
#[derive(Debug)]
pub struct ChangePasswordInput {
    pub user_id: UserId,
    pub current_password: ClearTextPassword,
    pub new_password: ClearTextPassword,
}

/// Change password use case
pub struct ChangePasswordUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> ChangePasswordUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, input: ChangePasswordInput) -> AuthResult<()> {
        let credentials = self
            .user_repo
            .find_credentials_by_id(input.user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !credentials
            .password
            .verify_async(input.current_password)
            .await?
        {
            return Err(AuthError::CurrentPasswordIncorrect);
        }

        let hashed = input.new_password.hash_async(self.config.bcrypt_cost).await?;
        self.user_repo
            .update_password(input.user_id, &hashed)
            .await?;

        tracing::info!(user_id = %input.user_id, "Password changed");

        Ok(())
    }
}
