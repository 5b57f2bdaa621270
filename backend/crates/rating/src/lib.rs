//! Rating Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, routers
//!
//! ## Features
//! - Store directory with live rating aggregates (average, count)
//! - One rating per (user, store); resubmission updates in place
//! - Raters listing for admins and the owning store owner
//! - Admin and store-owner dashboards
//!
//! Identity, roles and user lookups come from the `auth` crate.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use error::{RatingError, RatingResult};
pub use infra::postgres::PgRatingRepository;
pub use presentation::router::{dashboard_router, rating_router, store_router};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

#[cfg(test)]
mod tests;
