//! Order submission records
//!
//! An order is immutable on entry apart from its residual quantity, which
//! the book decrements as the order fills. Price fields are populated
//! according to kind: `limit_price` only for limit orders, `stop_price`
//! only for stop-loss orders.

use crate::ids::{OrderId, SessionId};
use crate::numeric::Price;
use serde::{Deserialize, Serialize};

/// Order side (buyer or seller)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    pub fn is_buy(&self) -> bool {
        matches!(self, Side::Buy)
    }
}

/// How an order interacts with the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderKind {
    /// Executes up to its limit price; any residual rests on the book.
    Limit,
    /// Executes against whatever the opposite ladder offers; never rests.
    Market,
    /// Held off-book until the last-trade price reaches the trigger, then
    /// converted to a market order.
    StopLoss,
}

/// A single order submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub session: SessionId,
    pub side: Side,
    pub kind: OrderKind,
    /// Limit price; `Some` only when `kind == Limit`.
    pub limit_price: Option<Price>,
    /// Trigger price; `Some` only when `kind == StopLoss`.
    pub stop_price: Option<Price>,
    /// Residual quantity. Positive on entry, decremented by fills.
    pub quantity: u64,
    /// Monotonic nanosecond stamp assigned by the dispatcher at enqueue.
    pub arrival: u64,
}

impl Order {
    pub fn limit(id: OrderId, session: SessionId, side: Side, price: Price, quantity: u64) -> Self {
        Self {
            id,
            session,
            side,
            kind: OrderKind::Limit,
            limit_price: Some(price),
            stop_price: None,
            quantity,
            arrival: 0,
        }
    }

    pub fn market(id: OrderId, session: SessionId, side: Side, quantity: u64) -> Self {
        Self {
            id,
            session,
            side,
            kind: OrderKind::Market,
            limit_price: None,
            stop_price: None,
            quantity,
            arrival: 0,
        }
    }

    pub fn stop_loss(
        id: OrderId,
        session: SessionId,
        side: Side,
        trigger: Price,
        quantity: u64,
    ) -> Self {
        Self {
            id,
            session,
            side,
            kind: OrderKind::StopLoss,
            limit_price: None,
            stop_price: Some(trigger),
            quantity,
            arrival: 0,
        }
    }

    /// Decrement the residual quantity by a fill.
    ///
    /// # Panics
    /// Panics if the fill exceeds the residual.
    pub fn fill(&mut self, quantity: u64) {
        assert!(
            quantity <= self.quantity,
            "Fill would exceed order quantity"
        );
        self.quantity -= quantity;
    }

    /// Whether the order has no residual quantity left.
    pub fn is_filled(&self) -> bool {
        self.quantity == 0
    }

    /// Convert a triggered stop into the market order it executes as.
    ///
    /// Keeps id, session, side, quantity and arrival; drops the trigger.
    pub fn into_market(self) -> Self {
        Self {
            kind: OrderKind::Market,
            limit_price: None,
            stop_price: None,
            ..self
        }
    }
}
