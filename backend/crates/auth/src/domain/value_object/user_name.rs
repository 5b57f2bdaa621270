//! User Name Value Object
//!
//! ユーザーの表示名（フルネーム）。
//!
//! ## 不変条件
//! - 長さ: 20〜60文字（前後の空白を除いた文字数）

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Minimum length for user name (in characters)
pub const USER_NAME_MIN_LENGTH: usize = 20;

/// Maximum length for user name (in characters)
pub const USER_NAME_MAX_LENGTH: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Name must be between 20 and 60 characters")]
pub struct InvalidUserName;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserName(String);

impl UserName {
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidUserName> {
        let raw = raw.into();
        let trimmed = raw.trim();
        let len = trimmed.chars().count();
        if !(USER_NAME_MIN_LENGTH..=USER_NAME_MAX_LENGTH).contains(&len) {
            return Err(InvalidUserName);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn from_db(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_bounds() {
        assert!(UserName::new("a".repeat(19)).is_err());
        assert!(UserName::new("a".repeat(20)).is_ok());
        assert!(UserName::new("a".repeat(60)).is_ok());
        assert!(UserName::new("a".repeat(61)).is_err());
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        // 20 multi-byte characters
        assert!(UserName::new("あ".repeat(20)).is_ok());
    }

    #[test]
    fn test_trims_surrounding_whitespace() {
        let name = UserName::new("  Alexander Hamilton Junior  ").unwrap();
        assert_eq!(name.as_str(), "Alexander Hamilton Junior");
        assert!(UserName::new(format!("   {}   ", "a".repeat(19))).is_err());
    }
}
