//! Bid (buy-side) ladder
//!
//! Buy limits keyed by price; iterated in descending price order, so the
//! highest bid is first. BTreeMap keeps iteration deterministic.

use std::collections::BTreeMap;
use types::numeric::Price;
use types::order::{Order, OrderKind, Side};

use super::price_level::PriceLevel;

/// Buy-side price ladder, best (highest) price first.
#[derive(Debug, Clone, Default)]
pub struct BidBook {
    levels: BTreeMap<Price, PriceLevel>,
}

impl BidBook {
    pub fn new() -> Self {
        Self {
            levels: BTreeMap::new(),
        }
    }

    /// Rest a buy limit order at its price level, creating it if absent.
    ///
    /// # Panics
    /// Panics if the order is not a buy limit.
    pub fn insert(&mut self, order: Order) {
        assert_eq!(order.side, Side::Buy, "bid ladder holds buy orders only");
        assert_eq!(order.kind, OrderKind::Limit, "only limit orders rest");
        let price = order
            .limit_price
            .expect("resting limit order carries a price");
        self.levels.entry(price).or_default().push(order);
    }

    /// Best bid price (highest).
    pub fn best_price(&self) -> Option<Price> {
        // BTreeMap iterates ascending, so the best bid is the last key
        self.levels.keys().next_back().copied()
    }

    /// Mutable access to the best level, with its price.
    pub fn best_level_mut(&mut self) -> Option<(Price, &mut PriceLevel)> {
        self.levels
            .iter_mut()
            .next_back()
            .map(|(price, level)| (*price, level))
    }

    /// Drop an emptied level so the ladder never holds hollow keys.
    pub fn remove_level(&mut self, price: Price) {
        self.levels.remove(&price);
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Iterate levels best-first (descending price).
    pub fn iter(&self) -> impl Iterator<Item = (&Price, &PriceLevel)> {
        self.levels.iter().rev()
    }
}
