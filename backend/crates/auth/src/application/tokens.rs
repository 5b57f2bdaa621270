//! Token Issuance
//!
//! Access tokens carry `{id, email, role}`; refresh tokens carry `{id}` only.

use serde::{Deserialize, Serialize};

use platform::token::{ExpiringClaims, issue_window};

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::value_object::user_role::UserRole;
use crate::error::AuthResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub id: i32,
    pub email: String,
    pub role: UserRole,
    pub iat: i64,
    pub exp: i64,
}

impl ExpiringClaims for AccessClaims {
    fn exp(&self) -> i64 {
        self.exp
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub id: i32,
    pub iat: i64,
    pub exp: i64,
}

impl ExpiringClaims for RefreshClaims {
    fn exp(&self) -> i64 {
        self.exp
    }
}

/// Freshly issued access + refresh token
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub token: String,
    pub refresh_token: String,
}

/// Sign a new token pair for `user`
pub fn issue_pair(config: &AuthConfig, user: &User) -> AuthResult<TokenPair> {
    let signer = config.signer();

    let (iat, exp) = issue_window(config.access_token_ttl);
    let token = signer.sign(&AccessClaims {
        id: user.id.get(),
        email: user.email.as_str().to_owned(),
        role: user.role,
        iat,
        exp,
    })?;

    let (iat, exp) = issue_window(config.refresh_token_ttl);
    let refresh_token = signer.sign(&RefreshClaims {
        id: user.id.get(),
        iat,
        exp,
    })?;

    Ok(TokenPair {
        token,
        refresh_token,
    })
}
