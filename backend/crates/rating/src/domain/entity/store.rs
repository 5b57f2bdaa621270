//! Store Entity
//!
//! Stores are read together with their rating aggregate; the average and
//! count are derived from the `ratings` table, never stored.

use auth::models::{address::Address, email::Email};
use chrono::{DateTime, Utc};
use kernel::id::{StoreId, UserId};
use kernel::rating::AverageRating;
use serde::Serialize;

use crate::domain::value_object::{rating_value::RatingValue, store_name::StoreName};

/// Store row with its rating aggregate
#[derive(Debug, Clone)]
pub struct StoreSummary {
    pub id: StoreId,
    pub name: String,
    pub email: String,
    pub address: String,
    pub owner_id: Option<UserId>,
    pub average_rating: AverageRating,
    pub rating_count: i64,
}

/// Fields for a new store row
#[derive(Debug)]
pub struct NewStore {
    pub name: StoreName,
    pub email: Email,
    pub address: Address,
    pub owner_id: Option<UserId>,
}

/// Partial update
///
/// `owner` is doubly optional: `None` leaves the owner untouched,
/// `Some(None)` unassigns it.
#[derive(Debug, Default)]
pub struct StoreChanges {
    pub name: Option<StoreName>,
    pub email: Option<Email>,
    pub address: Option<Address>,
    pub owner: Option<Option<UserId>>,
}

/// Listing filters (case-insensitive substring match)
#[derive(Debug, Clone, Default)]
pub struct StoreFilter {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

/// A user who rated a store, with their rating
#[derive(Debug, Clone, Serialize)]
pub struct Rater {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub address: String,
    pub rating_value: RatingValue,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
