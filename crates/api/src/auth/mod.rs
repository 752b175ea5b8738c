//! Authentication primitives.
//!
//! - [`jwt`] -- JWT access-token validation (tokens are issued upstream).

pub mod jwt;
