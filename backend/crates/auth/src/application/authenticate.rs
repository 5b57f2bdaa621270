//! Authenticate Use Case
//!
//! Resolves a bearer token to the caller's identity:
//! `Unauthenticated → TokenPresent → TokenValid → IdentityResolved`.

use std::sync::Arc;

use kernel::id::UserId;

use crate::application::config::AuthConfig;
use crate::application::tokens::AccessClaims;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_role::UserRole;
use crate::error::{AuthError, AuthResult};

const BEARER_PREFIX: &str = "Bearer ";

/// Caller identity attached to an authenticated request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

impl From<User> for Identity {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email.into_db(),
            role: user.role,
        }
    }
}

impl Identity {
    /// Authorization step: the resolved role must be in `allowed`
    pub fn authorize(&self, allowed: &[UserRole]) -> AuthResult<()> {
        if self.role.is_in(allowed) {
            Ok(())
        } else {
            Err(AuthError::Forbidden)
        }
    }
}

/// Token from an `Authorization: Bearer <token>` header value
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    header?
        .strip_prefix(BEARER_PREFIX)
        .map(|rest| rest.split(' ').next().unwrap_or_default())
}

/// Authenticate use case
pub struct AuthenticateUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> AuthenticateUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    /// Run the full state machine on a raw `Authorization` header value
    pub async fn execute(&self, authorization: Option<&str>) -> AuthResult<Identity> {
        let token = bearer_token(authorization).ok_or(AuthError::AuthRequired)?;

        let claims: AccessClaims = self.config.signer().verify(token)?;

        let user = self
            .user_repo
            .find_by_id(UserId::new(claims.id))
            .await?
            .ok_or(AuthError::UserGone)?;

        Ok(Identity::from(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token(Some("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(bearer_token(Some("Bearer ")), Some(""));
        assert_eq!(bearer_token(Some("Basic dXNlcg==")), None);
        assert_eq!(bearer_token(Some("bearer abc")), None);
        assert_eq!(bearer_token(None), None);
    }

    #[test]
    fn test_authorize() {
        let identity = Identity {
            id: UserId::new(1),
            name: "Store Owner Number One".into(),
            email: "owner@example.com".into(),
            role: UserRole::StoreOwner,
        };
        assert!(identity.authorize(&[UserRole::Admin, UserRole::StoreOwner]).is_ok());
        assert!(matches!(
            identity.authorize(&[UserRole::Admin]),
            Err(AuthError::Forbidden)
        ));
    }
}
