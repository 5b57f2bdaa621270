//! Address Value Object

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum address length (in characters)
pub const ADDRESS_MAX_LENGTH: usize = 400;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidAddress {
    #[error("Address must not exceed 400 characters")]
    TooLong,
    #[error("Address is required")]
    Empty,
}

/// Postal address, possibly empty for users
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidAddress> {
        let raw = raw.into();
        if raw.chars().count() > ADDRESS_MAX_LENGTH {
            return Err(InvalidAddress::TooLong);
        }
        Ok(Self(raw))
    }

    /// Same as [`new`](Self::new) but rejects blank input
    pub fn required(raw: impl Into<String>) -> Result<Self, InvalidAddress> {
        let address = Self::new(raw)?;
        if address.0.trim().is_empty() {
            return Err(InvalidAddress::Empty);
        }
        Ok(address)
    }

    pub fn from_db(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_length() {
        assert!(Address::new("x".repeat(400)).is_ok());
        assert_eq!(
            Address::new("x".repeat(401)).unwrap_err(),
            InvalidAddress::TooLong
        );
    }

    #[test]
    fn test_empty_allowed_unless_required() {
        assert!(Address::new("").is_ok());
        assert_eq!(Address::required("  ").unwrap_err(), InvalidAddress::Empty);
        assert!(Address::required("1 Main St").is_ok());
    }
}
