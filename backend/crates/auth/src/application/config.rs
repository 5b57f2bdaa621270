//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::env;
use std::fmt;
use std::time::Duration;

use platform::password::BCRYPT_COST;
use platform::token::{TokenSigner, parse_ttl};
use rand::RngCore;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthConfigError {
    #[error("JWT_SECRET must be set in production")]
    MissingSecret,

    #[error("{var} is not a valid duration: {value:?}")]
    InvalidDuration { var: &'static str, value: String },
}

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HS256 signing secret
    pub jwt_secret: Vec<u8>,
    /// Access token lifetime (default 1 day)
    pub access_token_ttl: Duration,
    /// Refresh token lifetime (default 7 days)
    pub refresh_token_ttl: Duration,
    /// bcrypt work factor
    pub bcrypt_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: Vec::new(),
            access_token_ttl: Duration::from_secs(24 * 3600), // 1 day
            refresh_token_ttl: Duration::from_secs(7 * 24 * 3600), // 1 week
            bcrypt_cost: BCRYPT_COST,
        }
    }
}

impl AuthConfig {
    /// Create config with a random signing secret
    pub fn with_random_secret() -> Self {
        let mut secret = [0u8; 32];
        rand::rng().fill_bytes(&mut secret);
        Self {
            jwt_secret: secret.to_vec(),
            ..Default::default()
        }
    }

    /// Create config for development (tokens do not survive restarts)
    pub fn development() -> Self {
        Self::with_random_secret()
    }

    /// Read `JWT_SECRET`, `JWT_EXPIRES_IN` and `JWT_REFRESH_EXPIRES_IN`.
    ///
    /// Debug builds fall back to a random secret; release builds require one.
    pub fn from_env() -> Result<Self, AuthConfigError> {
        let base = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => Self {
                jwt_secret: secret.into_bytes(),
                ..Default::default()
            },
            _ if cfg!(debug_assertions) => {
                tracing::warn!("JWT_SECRET not set, using a random development secret");
                Self::development()
            }
            _ => return Err(AuthConfigError::MissingSecret),
        };

        Ok(Self {
            access_token_ttl: ttl_from_env("JWT_EXPIRES_IN")?.unwrap_or(base.access_token_ttl),
            refresh_token_ttl: ttl_from_env("JWT_REFRESH_EXPIRES_IN")?
                .unwrap_or(base.refresh_token_ttl),
            ..base
        })
    }

    /// Token signer for the configured secret
    pub fn signer(&self) -> TokenSigner {
        TokenSigner::new(&self.jwt_secret)
    }
}

fn ttl_from_env(var: &'static str) -> Result<Option<Duration>, AuthConfigError> {
    match env::var(var) {
        Ok(value) => parse_ttl(&value)
            .map(Some)
            .ok_or(AuthConfigError::InvalidDuration { var, value }),
        Err(_) => Ok(None),
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}
