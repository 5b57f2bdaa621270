//! Value Object Module

pub mod address;
pub mod email;
pub mod user_name;
pub mod user_role;
