//! Shared domain types for the matching engine
//!
//! Identifier newtypes, exact-decimal prices, order and fill records, and
//! the submission error taxonomy. Everything here is plain data; the
//! matching rules live in the engine crate.

pub mod errors;
pub mod fill;
pub mod ids;
pub mod numeric;
pub mod order;

pub use errors::SubmitError;
pub use fill::Fill;
pub use ids::{OrderId, SessionId};
pub use numeric::Price;
pub use order::{Order, OrderKind, Side};
