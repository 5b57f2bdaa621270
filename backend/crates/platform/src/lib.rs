//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Password policy and bcrypt hashing
//! - Signed session tokens (JWT, HS256)
//! - Client identification
//! - Rate limiting infrastructure

pub mod client;
pub mod password;
pub mod rate_limit;
pub mod token;
