//! Ask (sell-side) ladder
//!
//! Sell limits keyed by price; iterated in ascending price order, so the
//! lowest ask is first. BTreeMap keeps iteration deterministic.

use std::collections::BTreeMap;
use types::numeric::Price;
use types::order::{Order, OrderKind, Side};

use super::price_level::PriceLevel;

/// Sell-side price ladder, best (lowest) price first.
#[derive(Debug, Clone, Default)]
pub struct AskBook {
    levels: BTreeMap<Price, PriceLevel>,
}

impl AskBook {
    pub fn new() -> Self {
        Self {
            levels: BTreeMap::new(),
        }
    }

    /// Rest a sell limit order at its price level, creating it if absent.
    ///
    /// # Panics
    /// Panics if the order is not a sell limit.
    pub fn insert(&mut self, order: Order) {
        assert_eq!(order.side, Side::Sell, "ask ladder holds sell orders only");
        assert_eq!(order.kind, OrderKind::Limit, "only limit orders rest");
        let price = order
            .limit_price
            .expect("resting limit order carries a price");
        self.levels.entry(price).or_default().push(order);
    }

    /// Best ask price (lowest).
    pub fn best_price(&self) -> Option<Price> {
        self.levels.keys().next().copied()
    }

    /// Mutable access to the best level, with its price.
    pub fn best_level_mut(&mut self) -> Option<(Price, &mut PriceLevel)> {
        self.levels
            .iter_mut()
            .next()
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

    /// Iterate levels best-first (ascending price).
    pub fn iter(&self) -> impl Iterator<Item = (&Price, &PriceLevel)> {
        self.levels.iter()
    }
}
