//! Pending stop-loss orders
//!
//! Stops are held off-book in insertion order and rescanned against the
//! last-trade price after every pass that printed a trade. A buy stop
//! arms at or above its trigger, a sell stop at or below.

use types::numeric::Price;
use types::order::{Order, OrderKind, Side};

/// The off-book set of stop-loss orders awaiting their trigger.
#[derive(Debug, Clone, Default)]
pub struct StopBook {
    pending: Vec<Order>,
}

impl StopBook {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    /// Hold a stop order until triggered.
    ///
    /// # Panics
    /// Panics if the order is not a stop-loss.
    pub fn push(&mut self, order: Order) {
        assert_eq!(
            order.kind,
            OrderKind::StopLoss,
            "stop book holds stop-loss orders only"
        );
        self.pending.push(order);
    }

    /// Remove and return the first stop (in insertion order) whose trigger
    /// condition holds against the given last-trade price.
    ///
    /// The caller rescans after every trigger, since the triggered stop's
    /// own fills move the last-trade price.
    pub fn take_triggered(&mut self, last_trade: Price) -> Option<Order> {
        let position = self.pending.iter().position(|stop| {
            let trigger = stop
                .stop_price
                .expect("pending stop carries a trigger price");
            match stop.side {
                Side::Buy => last_trade >= trigger,
                Side::Sell => last_trade <= trigger,
            }
        })?;
        Some(self.pending.remove(position))
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.pending.iter()
    }
}
