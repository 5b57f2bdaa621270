//! Presentation Layer
//!
//! HTTP handlers, DTOs and routers.

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::RatingAppState;
pub use router::{
    dashboard_router, dashboard_router_generic, rating_router, rating_router_generic,
    store_router, store_router_generic,
};
