//! Signed Session Tokens
//!
//! HS256 JWTs. Access tokens carry `{id, email, role}`, refresh tokens `{id}`.
//! Expiry is checked against the current time with no leeway, in addition
//! to the library's own validation, so a token whose `exp` is at or before
//! now is always rejected as expired.

use std::time::Duration;

use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Signature or structure check failed
    #[error("Invalid token")]
    Invalid,

    /// `exp` is at or before the current time
    #[error("Token expired")]
    Expired,

    #[error("Token signing failed: {0}")]
    Signing(String),
}

/// Registered claims every token carries
pub trait ExpiringClaims {
    fn exp(&self) -> i64;
}

/// HS256 signer/verifier around one shared secret
#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenSigner {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    pub fn sign<C: Serialize>(&self, claims: &C) -> Result<String, TokenError> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    pub fn verify<C>(&self, token: &str) -> Result<C, TokenError>
    where
        C: DeserializeOwned + ExpiringClaims,
    {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let data = jsonwebtoken::decode::<C>(token, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                JwtErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            }
        })?;

        if data.claims.exp() <= now_secs() {
            return Err(TokenError::Expired);
        }

        Ok(data.claims)
    }
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner").finish_non_exhaustive()
    }
}

/// Current Unix time in seconds
pub fn now_secs() -> i64 {
    chrono::Utc::now().timestamp()
}

/// `(iat, exp)` for a token issued now with the given lifetime
pub fn issue_window(ttl: Duration) -> (i64, i64) {
    let iat = now_secs();
    let ttl = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
    (iat, iat.saturating_add(ttl))
}

/// Parse a lifetime such as `"1d"`, `"12h"`, `"30m"`, `"45s"` or bare seconds
///
/// ```rust
/// use std::time::Duration;
/// use platform::token::parse_ttl;
///
/// assert_eq!(parse_ttl("7d"), Some(Duration::from_secs(7 * 86_400)));
/// assert_eq!(parse_ttl("90"), Some(Duration::from_secs(90)));
/// assert_eq!(parse_ttl("soon"), None);
/// ```
pub fn parse_ttl(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    let (digits, unit) = match raw.find(|c: char| !c.is_ascii_digit()) {
        Some(idx) => raw.split_at(idx),
        None => (raw, "s"),
    };
    let n: u64 = digits.parse().ok()?;
    let secs = match unit {
        "s" => n,
        "m" => n.checked_mul(60)?,
        "h" => n.checked_mul(3_600)?,
        "d" => n.checked_mul(86_400)?,
        _ => return None,
    };
    Some(Duration::from_secs(secs))
}
