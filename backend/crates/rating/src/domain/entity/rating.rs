//! Rating Entity
//!
//! At most one rating exists per (user, store) pair; resubmitting replaces
//! the value.

use chrono::{DateTime, Utc};
use kernel::id::{RatingId, StoreId, UserId};
use serde::Serialize;

use crate::domain::value_object::rating_value::RatingValue;

/// Raw rating row
#[derive(Debug, Clone, Serialize)]
pub struct Rating {
    pub id: RatingId,
    pub user_id: UserId,
    pub store_id: StoreId,
    pub rating_value: RatingValue,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Rating joined with the rater's and the store's names
#[derive(Debug, Clone, Serialize)]
pub struct RatingDetail {
    pub id: RatingId,
    pub rating_value: RatingValue,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_id: UserId,
    pub store_id: StoreId,
    pub user_name: String,
    pub store_name: String,
}

/// Row of the admin rating listing
#[derive(Debug, Clone, Serialize)]
pub struct RatingListItem {
    pub id: RatingId,
    pub rating_value: RatingValue,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_name: String,
    pub user_email: String,
    pub store_name: String,
}

/// Admin listing filters; all exact / inclusive-bound matches
#[derive(Debug, Clone, Copy, Default)]
pub struct RatingFilter {
    pub user_id: Option<UserId>,
    pub store_id: Option<StoreId>,
    pub min_rating: Option<RatingValue>,
    pub max_rating: Option<RatingValue>,
}

/// Whether an upsert inserted a new row or replaced an existing value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created,
    Updated,
}

impl SubmitOutcome {
    pub fn from_inserted(inserted: bool) -> Self {
        if inserted {
            Self::Created
        } else {
            Self::Updated
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Created => "Rating submitted successfully",
            Self::Updated => "Rating updated successfully",
        }
    }
}
