//! Average rating
//!
//! Averages are stored as `f64` and always rendered with one decimal,
//! e.g. `"4.0"`. A store with no ratings averages `"0.0"`.

use std::fmt;

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AverageRating(f64);

impl AverageRating {
    pub const ZERO: Self = Self(0.0);

    /// From a nullable SQL `AVG(...)`
    pub fn from_avg(avg: Option<f64>) -> Self {
        Self(avg.filter(|v| v.is_finite()).unwrap_or(0.0))
    }

    /// Mean of a set of values, zero when empty
    pub fn of<I>(values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<f64>,
    {
        let (sum, count) = values
            .into_iter()
            .fold((0.0, 0u32), |(sum, n), v| (sum + v.into(), n + 1));
        if count == 0 {
            Self::ZERO
        } else {
            Self(sum / f64::from(count))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Rounded to one decimal place, halves away from zero
    pub fn rounded(self) -> f64 {
        (self.0 * 10.0).round() / 10.0
    }
}

impl fmt::Display for AverageRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.rounded())
    }
}

impl Serialize for AverageRating {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
