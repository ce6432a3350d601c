//! Fill records
//!
//! One fill is produced per maker consumed within a single taker pass.

use crate::ids::{OrderId, SessionId};
use crate::numeric::Price;
use serde::{Deserialize, Serialize};

/// An executed trade between a resting maker and an incoming taker.
///
/// The price is always the maker's resting price; price improvement
/// accrues to the taker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub maker_order_id: OrderId,
    pub taker_order_id: OrderId,
    pub maker_session: SessionId,
    pub taker_session: SessionId,
    pub price: Price,
    pub quantity: u64,
    /// Side of the taker: true when the incoming order was a buy.
    pub taker_is_buy: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_serialization_roundtrip() {
        let fill = Fill {
            maker_order_id: OrderId::new(1),
            taker_order_id: OrderId::new(2),
            maker_session: SessionId::new(10),
            taker_session: SessionId::new(20),
            price: Price::from_u64(100),
            quantity: 50,
            taker_is_buy: false,
        };
        let json = serde_json::to_string(&fill).unwrap();
        let back: Fill = serde_json::from_str(&json).unwrap();
        assert_eq!(fill, back);
    }
}
