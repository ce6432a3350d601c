//! Submission error taxonomy
//!
//! Errors surfaced to the originating session when an order is rejected
//! before it reaches the book. The book itself cannot fail on a
//! well-formed order; its invariants are asserts.

use thiserror::Error;

/// Why an order submission was rejected by the dispatcher.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// The session has no authenticated principal.
    #[error("Not logged in")]
    NotLoggedIn,

    /// Quantity must be a positive integer.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u64),

    /// Limit orders need a positive limit price, stops a positive trigger.
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    /// The engine is draining and no longer accepts orders.
    #[error("Engine shutting down")]
    ShuttingDown,
}
