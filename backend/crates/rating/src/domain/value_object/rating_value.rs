//! Rating Value Object
//!
//! 店舗への評価値。
//!
//! ## 不変条件
//! - 1〜5 の整数

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

use kernel::validation::integer_value;

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Rating must be an integer between 1 and 5")]
pub struct InvalidRatingValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RatingValue(u8);

impl RatingValue {
    pub fn new(value: i64) -> Result<Self, InvalidRatingValue> {
        u8::try_from(value)
            .ok()
            .filter(|v| (MIN_RATING..=MAX_RATING).contains(v))
            .map(Self)
            .ok_or(InvalidRatingValue)
    }

    /// From a JSON body field; integer-valued strings are accepted
    pub fn from_json(value: &Value) -> Result<Self, InvalidRatingValue> {
        integer_value(value).ok_or(InvalidRatingValue).and_then(Self::new)
    }

    /// From a `SMALLINT` column guarded by a CHECK constraint
    pub fn from_db(value: i16) -> Result<Self, InvalidRatingValue> {
        Self::new(i64::from(value))
    }

    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn into_db(self) -> i16 {
        i16::from(self.0)
    }
}

impl fmt::Display for RatingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<RatingValue> for f64 {
    fn from(value: RatingValue) -> Self {
        f64::from(value.0)
    }
}
