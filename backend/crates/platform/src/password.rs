//! Password Hashing and Verification
//!
//! - Password policy: 8 to 16 characters, at least one upper-case letter
//!   and one of `!@#$%^&*`
//! - bcrypt hashing (salted, adaptive, cost factor 10)
//! - Zeroization of clear text on drop
//!
//! bcrypt is CPU bound, so the async helpers run it on the blocking pool.

use std::fmt;

use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ============================================================================
// Constants
// ============================================================================

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length
pub const MAX_PASSWORD_LENGTH: usize = 16;

/// Characters that satisfy the special-character rule
pub const SPECIAL_CHARACTERS: &str = "!@#$%^&*";

/// bcrypt work factor
pub const BCRYPT_COST: u32 = 10;

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must be between 8 and 16 characters")]
    Length,

    #[error("Password must include at least one uppercase letter and one special character")]
    Composition,

    #[error("Password is required")]
    Empty,
}

/// Password hashing/verification errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(#[from] bcrypt::BcryptError),

    #[error("Password hashing task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// Not `Clone`; debug output is redacted.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Create a new password that satisfies the policy
    ///
    /// ```rust
    /// use platform::password::{ClearTextPassword, PasswordPolicyError};
    ///
    /// assert!(ClearTextPassword::new("Secret#123".to_string()).is_ok());
    /// assert_eq!(
    ///     ClearTextPassword::new("secret#123".to_string()).unwrap_err(),
    ///     PasswordPolicyError::Composition,
    /// );
    /// ```
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let char_count = raw.chars().count();
        if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&char_count) {
            return Err(PasswordPolicyError::Length);
        }

        let has_upper = raw.chars().any(|c| c.is_ascii_uppercase());
        let has_special = raw.chars().any(|c| SPECIAL_CHARACTERS.contains(c));
        if !has_upper || !has_special {
            return Err(PasswordPolicyError::Composition);
        }

        Ok(Self(raw))
    }

    /// Accept any non-empty input, for checking against a stored hash.
    ///
    /// Stored passwords may predate the current policy.
    pub fn for_verification(raw: String) -> Result<Self, PasswordPolicyError> {
        if raw.is_empty() {
            return Err(PasswordPolicyError::Empty);
        }
        Ok(Self(raw))
    }

    /// Create without validation
    #[cfg(test)]
    pub fn new_unchecked(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Hash with bcrypt at the given cost
    pub fn hash(&self, cost: u32) -> Result<HashedPassword, PasswordHashError> {
        let hash = bcrypt::hash(&self.0, cost)?;
        Ok(HashedPassword { hash })
    }

    /// [`hash`](Self::hash) on the blocking thread pool
    pub async fn hash_async(self, cost: u32) -> Result<HashedPassword, PasswordHashError> {
        tokio::task::spawn_blocking(move || self.hash(cost)).await?
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// bcrypt hash in modular crypt format (`$2b$10$...`)
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Wrap a hash read from storage
    pub fn from_stored(hash: impl Into<String>) -> Self {
        Self { hash: hash.into() }
    }

    /// Get the hash string for storage
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Verify a password against this hash
    ///
    /// A malformed stored hash never verifies.
    pub fn verify(&self, password: &ClearTextPassword) -> bool {
        match bcrypt::verify(&password.0, &self.hash) {
            Ok(matches) => matches,
            Err(e) => {
                tracing::warn!(error = %e, "Stored password hash could not be parsed");
                false
            }
        }
    }

    /// [`verify`](Self::verify) on the blocking thread pool
    pub async fn verify_async(&self, password: ClearTextPassword) -> Result<bool, PasswordHashError> {
        let hashed = self.clone();
        let matches = tokio::task::spawn_blocking(move || hashed.verify(&password)).await?;
        Ok(matches)
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
