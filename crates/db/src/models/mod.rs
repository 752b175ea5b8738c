//! Row structs matching the database tables.

pub mod preference;
