//! Line protocol parsing and rendering
//!
//! One request per newline-terminated line. Extra whitespace between
//! tokens is tolerated; trailing tokens are ignored, matching the loose
//! reads of typical hand-written clients.

use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use matching_engine::dispatcher::OrderRequest;
use types::fill::Fill;
use types::numeric::Price;
use types::order::{OrderKind, Side};

pub const LOGIN_OK: &str = "LOGIN OK";
pub const LOGIN_FAILED: &str = "LOGIN FAILED";
pub const ORDER_ACCEPTED: &str = "ORDER ACCEPTED";
pub const UNKNOWN_COMMAND: &str = "Unknown command";

/// A parsed client request.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Login {
        user: String,
        pass: String,
    },
    Order {
        side: Side,
        kind: OrderKind,
        /// Limit price for limits, trigger for stops, ignored for markets.
        price: Decimal,
        quantity: u64,
    },
}

/// Why a line could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown command")]
    UnknownCommand,

    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("Invalid side: {0}")]
    InvalidSide(String),

    #[error("Invalid order type: {0}")]
    InvalidKind(String),

    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),
}

/// Parse one request line (without its trailing newline).
pub fn parse_line(line: &str) -> Result<Request, ParseError> {
    let mut tokens = line.split_whitespace();
    let command = tokens.next().ok_or(ParseError::UnknownCommand)?;
    match command {
        "LOGIN" => {
            let user = tokens.next().ok_or(ParseError::MissingArgument("user"))?;
            let pass = tokens.next().ok_or(ParseError::MissingArgument("password"))?;
            Ok(Request::Login {
                user: user.to_string(),
                pass: pass.to_string(),
            })
        }
        "ORDER" => {
            let side = tokens.next().ok_or(ParseError::MissingArgument("side"))?;
            let kind = tokens.next().ok_or(ParseError::MissingArgument("type"))?;
            let price = tokens.next().ok_or(ParseError::MissingArgument("price"))?;
            let quantity = tokens
                .next()
                .ok_or(ParseError::MissingArgument("quantity"))?;

            let side = match side {
                "buy" => Side::Buy,
                "sell" => Side::Sell,
                other => return Err(ParseError::InvalidSide(other.to_string())),
            };
            let kind = match kind {
                "limit" => OrderKind::Limit,
                "market" => OrderKind::Market,
                "stop" => OrderKind::StopLoss,
                other => return Err(ParseError::InvalidKind(other.to_string())),
            };
            let price = Decimal::from_str(price)
                .map_err(|_| ParseError::InvalidPrice(price.to_string()))?;
            let quantity = quantity
                .parse::<u64>()
                .map_err(|_| ParseError::InvalidQuantity(quantity.to_string()))?;

            Ok(Request::Order {
                side,
                kind,
                price,
                quantity,
            })
        }
        _ => Err(ParseError::UnknownCommand),
    }
}

/// Map a parsed order onto the dispatcher's request shape.
///
/// The price token lands in the slot its kind gives meaning to; a
/// non-positive price yields `None` there and the dispatcher rejects it.
/// Market orders drop the token entirely.
pub fn order_request(side: Side, kind: OrderKind, price: Decimal, quantity: u64) -> OrderRequest {
    OrderRequest {
        side,
        kind,
        limit_price: match kind {
            OrderKind::Limit => Price::try_new(price),
            _ => None,
        },
        stop_price: match kind {
            OrderKind::StopLoss => Price::try_new(price),
            _ => None,
        },
        quantity,
    }
}

/// Render the asynchronous fill notification line.
pub fn render_fill(fill: &Fill) -> String {
    format!(
        "FILL: maker={} taker={} price={} qty={} isBuy={}",
        fill.maker_order_id, fill.taker_order_id, fill.price, fill.quantity, fill.taker_is_buy
    )
}

/// Render a synchronous error line.
pub fn render_error(reason: &impl fmt::Display) -> String {
    format!("ERROR: {reason}")
}
