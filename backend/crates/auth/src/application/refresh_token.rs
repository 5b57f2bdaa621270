//! Refresh Token Use Case
//!
//! Exchanges a valid refresh token for a brand-new token pair.
//! Every verification failure, expired or otherwise, is reported the same way.

use std::sync::Arc;

use kernel::id::UserId;

use crate::application::config::AuthConfig;
use crate::application::tokens::{RefreshClaims, TokenPair, issue_pair};
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

/// Refresh token use case
pub struct RefreshTokenUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> RefreshTokenUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, refresh_token: Option<&str>) -> AuthResult<TokenPair> {
        let token = refresh_token
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::RefreshTokenRequired)?;

        let claims: RefreshClaims = self
            .config
            .signer()
            .verify(token)
            .map_err(|_| AuthError::InvalidRefreshToken)?;

        let user = self
            .user_repo
            .find_by_id(UserId::new(claims.id))
            .await?
            .ok_or(AuthError::RefreshSubjectGone)?;

        tracing::debug!(user_id = %user.id, "Refresh token exchanged");

        issue_pair(&self.config, &user)
    }
}
