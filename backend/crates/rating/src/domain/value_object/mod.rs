//! Value Object Module

pub mod rating_value;
pub mod store_name;
