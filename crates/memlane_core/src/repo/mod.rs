//! Repository layer over the local SQLite database.
//!
//! # Responsibility
//! - Keep SQL details behind use-case oriented traits.

pub mod local_state_repo;
