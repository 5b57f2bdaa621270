//! Store Name Value Object

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Store name is required")]
pub struct InvalidStoreName;

/// Non-blank store name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreName(String);

impl StoreName {
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidStoreName> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(InvalidStoreName);
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoreName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
