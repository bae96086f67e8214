//! Message types used by the core matching engine.
//!
//! These are **transport-agnostic** logical messages:
//! - [`NewOrder`]: what an order source hands the engine.
//! - [`TradeReport`], [`Rejected`], [`CycleReport`]: what the engine produces.
//!
//! Text / JSON encoders live in the `engine-protocol` crate; this
//! module is purely logical.

use serde::{Deserialize, Serialize};

use crate::error::InvalidOrder;
use crate::order::{Order, OrderId};
use crate::side::Side;
use crate::top_of_book::BookSnapshot;

/// New order request (input), not yet validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrder {
    pub id: OrderId,
    pub side: Side,

    /// Limit price; must be positive.
    pub price: f64,

    /// Requested quantity; must be positive.
    pub quantity: f64,
}

/// One crossing step between the best bid and the best ask.
///
/// Both legs' limit prices are reported; no single clearing price is
/// derived from them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeReport {
    pub quantity: f64,
    pub bid_price: f64,
    pub ask_price: f64,
    pub buy_order_id: OrderId,
    pub sell_order_id: OrderId,
}

/// An order request that failed validation and was not submitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rejected {
    pub request: NewOrder,
    #[serde(serialize_with = "serialize_reason")]
    pub reason: InvalidOrder,
}

fn serialize_reason<S>(reason: &InvalidOrder, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(reason)
}

/// Everything that happened during one engine cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleReport {
    /// 1-based cycle counter.
    pub cycle: u64,

    /// Orders accepted into the book, in submission order.
    pub accepted: Vec<Order>,

    /// Requests rejected at construction.
    pub rejected: Vec<Rejected>,

    /// Crosses produced by the single match pass of this cycle.
    pub trades: Vec<TradeReport>,

    /// Resting orders after matching.
    pub book: BookSnapshot,
}

impl CycleReport {
    /// Total quantity traded during the cycle.
    pub fn traded_quantity(&self) -> f64 {
        self.trades.iter().map(|t| t.quantity).sum()
    }
}
