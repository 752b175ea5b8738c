//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument.

pub mod preference_repo;

pub use preference_repo::PreferenceRepo;
