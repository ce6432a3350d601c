//! Matching predicates
//!
//! Price-compatibility checks used by the book's matching pass.

pub mod crossing;

pub use crossing::taker_crosses;
