//! Read-only views of book state for reporting collaborators.

use serde::{Deserialize, Serialize};

use crate::order::Order;

/// Best price and remaining quantity on each side.
///
/// `None` means the side is empty.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TopOfBookSnapshot {
    pub bid_price: Option<f64>,
    pub bid_quantity: Option<f64>,
    pub ask_price: Option<f64>,
    pub ask_quantity: Option<f64>,
}

impl TopOfBookSnapshot {
    pub fn new(best_bid: Option<&Order>, best_ask: Option<&Order>) -> Self {
        TopOfBookSnapshot {
            bid_price: best_bid.map(Order::price),
            bid_quantity: best_bid.map(Order::quantity),
            ask_price: best_ask.map(Order::price),
            ask_quantity: best_ask.map(Order::quantity),
        }
    }

    /// Returns `true` if there is *no* bid and *no* ask.
    pub fn is_empty(&self) -> bool {
        self.bid_price.is_none() && self.ask_price.is_none()
    }

    /// Best ask minus best bid, if both sides are present.
    pub fn spread(&self) -> Option<f64> {
        Some(self.ask_price? - self.bid_price?)
    }
}

/// Owned copy of every resting order, each side in priority order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BookSnapshot {
    pub bids: Vec<Order>,
    pub asks: Vec<Order>,
}

impl BookSnapshot {
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    pub fn top_of_book(&self) -> TopOfBookSnapshot {
        TopOfBookSnapshot::new(self.bids.first(), self.asks.first())
    }
}
