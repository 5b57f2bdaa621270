//! Login Use Case
//!
//! Verifies email + password and signs a token pair.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::application::register::AuthOutput;
use crate::application::tokens::issue_pair;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

/// Login input
#[derive(Debug)]
pub struct LoginInput {
    pub email: Email,
    pub password: ClearTextPassword,
}

/// Login use case
pub struct LoginUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> LoginUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<AuthOutput> {
        // Unknown email and wrong password are indistinguishable to the caller
        let credentials = self
            .user_repo
            .find_credentials_by_email(&input.email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !credentials.password.verify_async(input.password).await? {
            return Err(AuthError::InvalidCredentials);
        }

        let user = credentials.user;
        let tokens = issue_pair(&self.config, &user)?;

        tracing::info!(user_id = %user.id, role = %user.role, "User logged in");

        Ok(AuthOutput { user, tokens })
    }
}
