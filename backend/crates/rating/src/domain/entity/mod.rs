//! Entity Module

pub mod rating;
pub mod store;
