//! Domain Layer
//!
//! Contains entities, value objects, and repository traits.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::rating::{Rating, RatingDetail, SubmitOutcome};
pub use entity::store::StoreSummary;
pub use repository::{RatingRepository, StoreRepository};
