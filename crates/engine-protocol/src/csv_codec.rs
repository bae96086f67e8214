//! CSV order / report codec.
//!
//! Input format (lines → [`Record`]):
//!
//! - New order:
//!   `N, side(B/S or buy/sell), price(float), qty(float)[, id(uuid)]`
//!   (a fresh id is assigned when omitted)
//!
//! - Match boundary (end of a batch):
//!   `M`
//!
//! Output format (engine output → line):
//!
//! - Accepted order:
//!   `A, id, side, price, quantity`
//!
//! - Rejected order:
//!   `R, id, reason`
//!
//! - Trade (both legs' prices):
//!   `T, quantity, bidPrice, askPrice, buyId, sellId`
//!
//! - Resting order:
//!   `O, id, side, price, remainingQuantity, timestampNs`

use std::num::ParseFloatError;

use engine_core::{CycleReport, NewOrder, Order, Rejected, Side, TradeReport, Uuid};
use thiserror::Error;

/// One decoded input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Order(NewOrder),
    Match,
}

/// Why an input line could not be decoded.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("unknown record type `{0}`")]
    UnknownRecord(String),

    #[error("`{record}` record expects {expected} fields, found {found}")]
    WrongFieldCount {
        record: char,
        expected: &'static str,
        found: usize,
    },

    #[error("invalid side `{0}`")]
    InvalidSide(String),

    #[error("invalid {field} `{value}`: {source}")]
    InvalidNumber {
        field: &'static str,
        value: String,
        source: ParseFloatError,
    },

    #[error("invalid order id `{0}`")]
    InvalidId(String),
}

/// Parse a single CSV line into a [`Record`].
///
/// Returns `Ok(None)` for blank lines or comments (starting with `#`).
/// Price and quantity are only checked to be numbers here; positivity
/// is enforced when the engine builds the order.
pub fn parse_order_line(line: &str) -> Result<Option<Record>, ParseError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let tokens = split_and_trim(trimmed, ',');

    match tokens[0] {
        "N" => parse_new_order(&tokens).map(Some),
        "M" => {
            if tokens.len() == 1 {
                Ok(Some(Record::Match))
            } else {
                Err(ParseError::WrongFieldCount {
                    record: 'M',
                    expected: "1",
                    found: tokens.len(),
                })
            }
        }
        other => Err(ParseError::UnknownRecord(other.to_string())),
    }
}

fn parse_new_order(tokens: &[&str]) -> Result<Record, ParseError> {
    // N, side, price, qty[, id]
    if tokens.len() != 4 && tokens.len() != 5 {
        return Err(ParseError::WrongFieldCount {
            record: 'N',
            expected: "4 or 5",
            found: tokens.len(),
        });
    }

    let side = Side::parse(tokens[1]).ok_or_else(|| ParseError::InvalidSide(tokens[1].to_string()))?;
    let price = parse_f64("price", tokens[2])?;
    let quantity = parse_f64("quantity", tokens[3])?;

    let id = match tokens.get(4) {
        Some(raw) => Uuid::parse_str(raw).map_err(|_| ParseError::InvalidId(raw.to_string()))?,
        None => Uuid::new_v4(),
    };

    Ok(Record::Order(NewOrder {
        id,
        side,
        price,
        quantity,
    }))
}

/// Format an order that was just accepted into the book.
pub fn format_accepted(order: &Order) -> String {
    format!(
        "A, {}, {}, {}, {}",
        order.id(),
        order.side().as_char(),
        order.price(),
        order.quantity()
    )
}

/// Format a rejected order request.
pub fn format_rejected(rejected: &Rejected) -> String {
    format!("R, {}, {}", rejected.request.id, rejected.reason)
}

/// Format a single crossing step.
pub fn format_trade(trade: &TradeReport) -> String {
    format!(
        "T, {}, {}, {}, {}, {}",
        trade.quantity, trade.bid_price, trade.ask_price, trade.buy_order_id, trade.sell_order_id
    )
}

/// Format a resting order.
pub fn format_order(order: &Order) -> String {
    format!(
        "O, {}, {}, {}, {}, {}",
        order.id(),
        order.side().as_char(),
        order.price(),
        order.quantity(),
        order.timestamp_ns()
    )
}

/// Format a whole cycle: accepted and rejected orders, trades, then the
/// remaining bids followed by the remaining asks.
pub fn format_cycle(report: &CycleReport) -> Vec<String> {
    let mut lines = Vec::with_capacity(
        1 + report.accepted.len()
            + report.rejected.len()
            + report.trades.len()
            + report.book.bids.len()
            + report.book.asks.len(),
    );

    lines.push(format!("# cycle {}", report.cycle));
    lines.extend(report.accepted.iter().map(format_accepted));
    lines.extend(report.rejected.iter().map(format_rejected));
    lines.extend(report.trades.iter().map(format_trade));
    lines.extend(report.book.bids.iter().map(format_order));
    lines.extend(report.book.asks.iter().map(format_order));
    lines
}

// -----------------------------------------------------------------------------
// Helpers
// -----------------------------------------------------------------------------

fn split_and_trim(s: &str, delimiter: char) -> Vec<&str> {
    s.split(delimiter).map(str::trim).collect()
}

fn parse_f64(field: &'static str, s: &str) -> Result<f64, ParseError> {
    s.parse::<f64>().map_err(|source| ParseError::InvalidNumber {
        field,
        value: s.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "67e55044-10b1-426f-9247-bb680e5fe0c8";

    #[test]
    fn parses_new_order_with_id() {
        let line = format!("N, B, 30.5, 10, {ID}");
        let record = parse_order_line(&line).unwrap().unwrap();
        assert_eq!(
            record,
            Record::Order(NewOrder {
                id: Uuid::parse_str(ID).unwrap(),
                side: Side::Buy,
                price: 30.5,
                quantity: 10.0,
            })
        );
    }

    #[test]
    fn parses_new_order_without_id_and_word_side() {
        let Some(Record::Order(order)) = parse_order_line("N,sell,29,0.25").unwrap() else {
            panic!("expected an order record");
        };
        assert_eq!(order.side, Side::Sell);
        assert_eq!(order.price, 29.0);
        assert_eq!(order.quantity, 0.25);
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        assert_eq!(parse_order_line("   "), Ok(None));
        assert_eq!(parse_order_line("# scenario"), Ok(None));
    }

    #[test]
    fn parses_match_marker() {
        assert_eq!(parse_order_line("M"), Ok(Some(Record::Match)));
        assert!(matches!(
            parse_order_line("M, 1"),
            Err(ParseError::WrongFieldCount { record: 'M', .. })
        ));
    }

    #[test]
    fn reports_malformed_lines() {
        assert_eq!(
            parse_order_line("X, 1"),
            Err(ParseError::UnknownRecord("X".into()))
        );
        assert!(matches!(
            parse_order_line("N, B, 30"),
            Err(ParseError::WrongFieldCount { found: 3, .. })
        ));
        assert_eq!(
            parse_order_line("N, Q, 30, 1"),
            Err(ParseError::InvalidSide("Q".into()))
        );
        assert!(matches!(
            parse_order_line("N, B, abc, 1"),
            Err(ParseError::InvalidNumber { field: "price", .. })
        ));
        assert_eq!(
            parse_order_line("N, B, 30, 1, not-a-uuid"),
            Err(ParseError::InvalidId("not-a-uuid".into()))
        );
    }

    #[test]
    fn non_positive_values_parse_and_are_left_to_the_engine() {
        let Some(Record::Order(order)) = parse_order_line("N, S, -1, 0").unwrap() else {
            panic!("expected an order record");
        };
        assert_eq!(order.price, -1.0);
        assert_eq!(order.quantity, 0.0);
    }

    #[test]
    fn formats_trade_and_resting_order() {
        let id = Uuid::parse_str(ID).unwrap();
        let trade = TradeReport {
            quantity: 7.0,
            bid_price: 30.0,
            ask_price: 29.5,
            buy_order_id: id,
            sell_order_id: id,
        };
        assert_eq!(format_trade(&trade), format!("T, 7, 30, 29.5, {ID}, {ID}"));

        let order = Order::with_timestamp(id, Side::Buy, 30.0, 3.0, 42).unwrap();
        assert_eq!(format_order(&order), format!("O, {ID}, B, 30, 3, 42"));
        assert_eq!(format_accepted(&order), format!("A, {ID}, B, 30, 3"));
    }
}
