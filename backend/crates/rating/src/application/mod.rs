//! Application Layer
//!
//! Use cases for stores, ratings and dashboards.

pub mod browse_stores;
pub mod dashboard;
pub mod manage_stores;
pub mod review_ratings;
pub mod store_raters;
pub mod submit_rating;

// Re-exports
pub use browse_stores::{BrowseStoresUseCase, StoreView};
pub use dashboard::{DashboardUseCase, OwnerDashboard, SystemTotals};
pub use manage_stores::{CreateStoreInput, ManageStoresUseCase, UpdateStoreInput};
pub use review_ratings::ReviewRatingsUseCase;
pub use store_raters::StoreRatersUseCase;
pub use submit_rating::{SubmitRatingInput, SubmitRatingUseCase};
