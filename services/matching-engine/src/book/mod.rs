//! The central limit order book
//!
//! Price ladders for resting limits, the pending stop set, and the
//! last-trade watermark. `submit` runs the matching pass and the stop
//! cascade to completion and returns every fill produced, in order. The
//! book performs no I/O and is owned exclusively by the dispatcher's
//! consumer task.

pub mod ask_book;
pub mod bid_book;
pub mod price_level;
pub mod stops;

pub use ask_book::AskBook;
pub use bid_book::BidBook;
pub use price_level::PriceLevel;
pub use stops::StopBook;

use types::fill::Fill;
use types::numeric::Price;
use types::order::{Order, OrderKind, Side};

use crate::matching::crossing;

/// Single-instrument order book with bid/ask ladders and pending stops.
#[derive(Debug, Clone, Default)]
pub struct OrderBook {
    bids: BidBook,
    asks: AskBook,
    stops: StopBook,
    /// Price of the most recent fill; `None` until the first trade prints.
    last_trade: Option<Price>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self {
            bids: BidBook::new(),
            asks: AskBook::new(),
            stops: StopBook::new(),
            last_trade: None,
        }
    }

    /// Apply one incoming order and return every fill it produced,
    /// direct fills first, cascade fills after, in production order.
    ///
    /// Stop-loss orders are held off-book and produce no fills here. A
    /// limit residual rests on its own side; a market residual is
    /// discarded.
    ///
    /// # Panics
    /// Panics on a zero-quantity order; the dispatcher rejects those
    /// before they reach the book.
    pub fn submit(&mut self, order: Order) -> Vec<Fill> {
        assert!(order.quantity > 0, "order quantity must be positive");
        let mut fills = Vec::new();

        if order.kind == OrderKind::StopLoss {
            self.stops.push(order);
            return fills;
        }

        let mut taker = order;
        self.match_incoming(&mut taker, &mut fills);

        if taker.kind == OrderKind::Limit && taker.quantity > 0 {
            match taker.side {
                Side::Buy => self.bids.insert(taker),
                Side::Sell => self.asks.insert(taker),
            }
        }
        // A market residual is dropped here: market orders never rest.

        if let Some(last_price) = fills.last().map(|fill| fill.price) {
            self.last_trade = Some(last_price);
            self.run_stop_cascade(&mut fills);
        }

        self.assert_uncrossed();
        fills
    }

    /// Best bid price, if any buy limit rests.
    pub fn best_bid(&self) -> Option<Price> {
        self.bids.best_price()
    }

    /// Best ask price, if any sell limit rests.
    pub fn best_ask(&self) -> Option<Price> {
        self.asks.best_price()
    }

    /// Price of the most recent fill across all submissions.
    pub fn last_trade(&self) -> Option<Price> {
        self.last_trade
    }

    /// Number of stop orders awaiting their trigger.
    pub fn pending_stop_count(&self) -> usize {
        self.stops.len()
    }

    /// Cross the taker against the opposite ladder under price-time
    /// priority. Fills execute at the maker's resting price.
    fn match_incoming(&mut self, taker: &mut Order, fills: &mut Vec<Fill>) {
        match taker.side {
            Side::Buy => Self::sweep_asks(&mut self.asks, taker, fills),
            Side::Sell => Self::sweep_bids(&mut self.bids, taker, fills),
        }
    }

    fn sweep_asks(asks: &mut AskBook, taker: &mut Order, fills: &mut Vec<Fill>) {
        while taker.quantity > 0 {
            let Some((price, level)) = asks.best_level_mut() else {
                break;
            };
            if !crossing::taker_crosses(taker.side, taker.limit_price, price) {
                break;
            }
            Self::consume_level(price, level, taker, fills);
            if level.is_empty() {
                asks.remove_level(price);
            }
        }
    }

    fn sweep_bids(bids: &mut BidBook, taker: &mut Order, fills: &mut Vec<Fill>) {
        while taker.quantity > 0 {
            let Some((price, level)) = bids.best_level_mut() else {
                break;
            };
            if !crossing::taker_crosses(taker.side, taker.limit_price, price) {
                break;
            }
            Self::consume_level(price, level, taker, fills);
            if level.is_empty() {
                bids.remove_level(price);
            }
        }
    }

    /// Consume makers at one level in FIFO order until the taker or the
    /// level is exhausted, emitting one fill per maker touched.
    fn consume_level(price: Price, level: &mut PriceLevel, taker: &mut Order, fills: &mut Vec<Fill>) {
        while taker.quantity > 0 {
            let Some(maker) = level.front() else {
                break;
            };
            let traded = taker.quantity.min(maker.quantity);
            fills.push(Fill {
                maker_order_id: maker.id,
                taker_order_id: taker.id,
                maker_session: maker.session,
                taker_session: taker.session,
                price,
                quantity: traded,
                taker_is_buy: taker.side.is_buy(),
            });
            level.fill_front(traded);
            taker.fill(traded);
        }
    }

    /// Re-evaluate pending stops against the moving last-trade price until
    /// none triggers. Each triggered stop becomes a market order whose own
    /// fills advance the watermark before the next evaluation; each round
    /// consumes one stop and never adds, so the cascade terminates.
    fn run_stop_cascade(&mut self, fills: &mut Vec<Fill>) {
        while let Some(last) = self.last_trade {
            let Some(stop) = self.stops.take_triggered(last) else {
                break;
            };
            let mut market = stop.into_market();
            let before = fills.len();
            self.match_incoming(&mut market, fills);
            if fills.len() > before {
                self.last_trade = fills.last().map(|fill| fill.price);
            }
            // The triggered order was a market: any residual is dropped.
        }
    }

    fn assert_uncrossed(&self) {
        if let (Some(bid), Some(ask)) = (self.bids.best_price(), self.asks.best_price()) {
            debug_assert!(bid < ask, "book crossed at rest: bid {bid} >= ask {ask}");
        }
    }
}
