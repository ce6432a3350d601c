//! Crossing detection logic
//!
//! Determines whether an incoming taker can execute against the best
//! resting price on the opposite ladder.

use types::numeric::Price;
use types::order::Side;

/// Check whether a taker crosses the best opposite resting price.
///
/// `limit` is `None` for market orders, which are unboundedly aggressive
/// and cross any resting price. A buy limit crosses while its price is at
/// or above the resting ask; a sell limit while at or below the resting
/// bid.
pub fn taker_crosses(side: Side, limit: Option<Price>, resting: Price) -> bool {
    match (side, limit) {
        (_, None) => true,
        (Side::Buy, Some(limit)) => limit >= resting,
        (Side::Sell, Some(limit)) => limit <= resting,
    }
}
