//! End-to-end matching scenarios against the order book
//!
//! Each test drives `OrderBook::submit` with a literal sequence of orders
//! and checks the exact fills, book state, and last-trade price.

use matching_engine::OrderBook;
use types::ids::{OrderId, SessionId};
use types::numeric::Price;
use types::order::{Order, Side};

fn limit(id: u64, session: u64, side: Side, price: u64, qty: u64) -> Order {
    Order::limit(
        OrderId::new(id),
        SessionId::new(session),
        side,
        Price::from_u64(price),
        qty,
    )
}

fn market(id: u64, session: u64, side: Side, qty: u64) -> Order {
    Order::market(OrderId::new(id), SessionId::new(session), side, qty)
}

fn stop(id: u64, session: u64, side: Side, trigger: u64, qty: u64) -> Order {
    Order::stop_loss(
        OrderId::new(id),
        SessionId::new(session),
        side,
        Price::from_u64(trigger),
        qty,
    )
}

#[test]
fn crossing_limit_pair_empties_the_book() {
    let mut book = OrderBook::new();
    assert!(book.submit(limit(1, 10, Side::Buy, 100, 50)).is_empty());

    let fills = book.submit(limit(2, 20, Side::Sell, 99, 50));

    assert_eq!(fills.len(), 1);
    assert_eq!(fills[0].maker_order_id, OrderId::new(1));
    assert_eq!(fills[0].taker_order_id, OrderId::new(2));
    assert_eq!(fills[0].price, Price::from_u64(100));
    assert_eq!(fills[0].quantity, 50);
    assert!(!fills[0].taker_is_buy);

    assert_eq!(book.best_bid(), None);
    assert_eq!(book.best_ask(), None);
    assert_eq!(book.last_trade(), Some(Price::from_u64(100)));
}

#[test]
fn partial_fill_leaves_residual_resting() {
    let mut book = OrderBook::new();
    book.submit(limit(1, 10, Side::Buy, 100, 100));

    let fills = book.submit(limit(2, 20, Side::Sell, 99, 50));

    assert_eq!(fills.len(), 1);
    assert_eq!(fills[0].price, Price::from_u64(100));
    assert_eq!(fills[0].quantity, 50);

    // Residual 50 of order 1 still rests as the best bid.
    assert_eq!(book.best_bid(), Some(Price::from_u64(100)));
    assert_eq!(book.best_ask(), None);
}

#[test]
fn market_order_eats_part_of_the_book() {
    let mut book = OrderBook::new();
    book.submit(limit(1, 10, Side::Sell, 101, 50));

    let fills = book.submit(market(2, 20, Side::Buy, 20));

    assert_eq!(fills.len(), 1);
    assert_eq!(fills[0].price, Price::from_u64(101));
    assert_eq!(fills[0].quantity, 20);
    assert!(fills[0].taker_is_buy);

    // Residual 30 of the ask remains.
    assert_eq!(book.best_ask(), Some(Price::from_u64(101)));
}

#[test]
fn stop_triggers_and_cascades_after_a_trade() {
    let mut book = OrderBook::new();
    book.submit(limit(1, 10, Side::Buy, 100, 50));
    book.submit(stop(2, 20, Side::Sell, 101, 30));

    // The sell at 100 prints a trade at 100; 100 <= 101 arms the sell
    // stop, which becomes a market order against the remaining bid.
    let fills = book.submit(limit(3, 30, Side::Sell, 100, 10));

    assert_eq!(fills.len(), 2);

    assert_eq!(fills[0].maker_order_id, OrderId::new(1));
    assert_eq!(fills[0].taker_order_id, OrderId::new(3));
    assert_eq!(fills[0].price, Price::from_u64(100));
    assert_eq!(fills[0].quantity, 10);
    assert!(!fills[0].taker_is_buy);

    assert_eq!(fills[1].maker_order_id, OrderId::new(1));
    assert_eq!(fills[1].taker_order_id, OrderId::new(2));
    assert_eq!(fills[1].price, Price::from_u64(100));
    assert_eq!(fills[1].quantity, 30);
    assert!(!fills[1].taker_is_buy);

    // 50 - 10 - 30 leaves 10 resting at 100.
    assert_eq!(book.best_bid(), Some(Price::from_u64(100)));
    assert_eq!(book.pending_stop_count(), 0);
}

#[test]
fn price_improvement_goes_to_the_taker() {
    let mut book = OrderBook::new();
    book.submit(limit(1, 10, Side::Sell, 99, 10));

    let fills = book.submit(limit(2, 20, Side::Buy, 105, 10));

    assert_eq!(fills.len(), 1);
    // Execution at the maker's resting price, not the taker's limit.
    assert_eq!(fills[0].price, Price::from_u64(99));
}

#[test]
fn fifo_within_a_level() {
    let mut book = OrderBook::new();
    book.submit(limit(1, 10, Side::Buy, 100, 50));
    book.submit(limit(2, 20, Side::Buy, 100, 50));

    let fills = book.submit(limit(3, 30, Side::Sell, 100, 60));

    assert_eq!(fills.len(), 2);
    assert_eq!(fills[0].maker_order_id, OrderId::new(1));
    assert_eq!(fills[0].quantity, 50);
    assert_eq!(fills[1].maker_order_id, OrderId::new(2));
    assert_eq!(fills[1].quantity, 10);

    // Order 2's residual 40 still rests at 100.
    assert_eq!(book.best_bid(), Some(Price::from_u64(100)));
}

#[test]
fn exact_match_removes_exactly_one_order() {
    let mut book = OrderBook::new();
    book.submit(limit(1, 10, Side::Sell, 100, 25));
    book.submit(limit(2, 10, Side::Sell, 101, 25));

    let fills = book.submit(limit(3, 20, Side::Buy, 100, 25));

    assert_eq!(fills.len(), 1);
    assert_eq!(fills[0].quantity, 25);
    // Only the touched ask is gone; the other level is intact.
    assert_eq!(book.best_ask(), Some(Price::from_u64(101)));
    assert_eq!(book.best_bid(), None);
}

#[test]
fn non_crossing_limit_does_not_touch_the_opposite_ladder() {
    let mut book = OrderBook::new();
    book.submit(limit(1, 10, Side::Sell, 105, 10));

    let fills = book.submit(limit(2, 20, Side::Buy, 100, 10));

    assert!(fills.is_empty());
    assert_eq!(book.best_ask(), Some(Price::from_u64(105)));
    assert_eq!(book.best_bid(), Some(Price::from_u64(100)));
    assert_eq!(book.last_trade(), None);
}

#[test]
fn untriggered_stop_survives_unrelated_trades() {
    let mut book = OrderBook::new();
    book.submit(stop(1, 10, Side::Buy, 200, 30));
    book.submit(limit(2, 20, Side::Buy, 100, 10));

    let fills = book.submit(limit(3, 30, Side::Sell, 100, 10));

    // The trade printed at 100, below the buy stop's 200 trigger.
    assert_eq!(fills.len(), 1);
    assert_eq!(book.pending_stop_count(), 1);
}

#[test]
fn cascade_rescans_stops_armed_by_earlier_triggers() {
    let mut book = OrderBook::new();
    // A deep bid ladder to absorb the cascade.
    book.submit(limit(1, 10, Side::Buy, 100, 10));
    book.submit(limit(2, 10, Side::Buy, 95, 10));

    // First pending stop only arms at 95 or below; the second arms at 100.
    book.submit(stop(3, 20, Side::Sell, 95, 10));
    book.submit(stop(4, 30, Side::Sell, 100, 10));

    // The direct trade prints 100, arming only stop 4. Stop 4's market
    // order walks down to 95, and the rescan then finds stop 3 armed by
    // the new last-trade price.
    let fills = book.submit(limit(5, 40, Side::Sell, 100, 5));

    // Direct fill 5@100; stop 4 fills 5@100 then 5@95; stop 3 gets the
    // remaining 5@95 and its market residual expires.
    assert_eq!(fills[0].quantity, 5);
    assert_eq!(fills[0].price, Price::from_u64(100));

    let total_traded: u64 = fills.iter().map(|f| f.quantity).sum();
    assert_eq!(total_traded, 5 + 10 + 5);
    assert_eq!(book.pending_stop_count(), 0);
    assert_eq!(book.best_bid(), None);
    assert_eq!(book.last_trade(), Some(Price::from_u64(95)));
}

#[test]
fn quantity_is_conserved_across_fills() {
    let mut book = OrderBook::new();
    book.submit(limit(1, 10, Side::Buy, 100, 30));
    book.submit(limit(2, 10, Side::Buy, 99, 30));

    let fills = book.submit(limit(3, 20, Side::Sell, 99, 45));

    let taker_total: u64 = fills.iter().map(|f| f.quantity).sum();
    assert_eq!(taker_total, 45);
    for fill in &fills {
        assert!(fill.quantity > 0);
    }
    // Order 2 keeps 30 - 15 = 15 at 99.
    assert_eq!(book.best_bid(), Some(Price::from_u64(99)));
}
