//! Memory archive domain model.
//!
//! # Responsibility
//! - Define canonical data structures consumed by feed, review and layout.
//! - Own timestamp parsing and card-label formatting.
//!
//! # Invariants
//! - Every record is identified by its store-assigned key.
//! - Display order is always derived, never stored.

pub mod image;
pub mod memory;
pub mod timestamp;
