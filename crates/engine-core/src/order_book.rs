//! Single-instrument order book with price-time priority.
//!
//! - Bids: descending by price (best = highest).
//! - Asks: ascending by price (best = lowest).
//! - FIFO (time priority) among equal prices.
//!
//! Each side is a flat `VecDeque<Order>` kept fully sorted after every
//! mutation. New orders are inserted at the position a stable re-sort
//! would give them, so the observable order is the same as appending
//! and re-sorting the whole side.

use std::cmp::Ordering;
use std::collections::VecDeque;

use tracing::debug;

use crate::error::InvalidOrder;
use crate::messages::TradeReport;
use crate::order::Order;
use crate::priority::{is_sorted, price_time_priority};
use crate::side::Side;
use crate::top_of_book::{BookSnapshot, TopOfBookSnapshot};

/// Single-instrument order book.
#[derive(Debug, Default, Clone)]
pub struct OrderBook {
    /// Resting buy orders, best first.
    bids: VecDeque<Order>,

    /// Resting sell orders, best first.
    asks: VecDeque<Order>,
}

impl OrderBook {
    /// Create a new, empty order book.
    pub fn new() -> Self {
        OrderBook::default()
    }

    /// Accept an order into its side of the book.
    ///
    /// The order is re-validated because deserialized orders never went
    /// through a constructor. Orders are not deduplicated by id.
    pub fn submit(&mut self, order: Order) -> Result<(), InvalidOrder> {
        order.validate()?;

        debug!(
            id = %order.id(),
            side = %order.side(),
            price = order.price(),
            quantity = order.quantity(),
            "order accepted"
        );

        let side = order.side();
        let levels = self.side_mut(side);
        let pos = levels.partition_point(|resting| {
            price_time_priority(side, resting, &order) != Ordering::Greater
        });
        levels.insert(pos, order);

        self.debug_check_invariants();
        Ok(())
    }

    /// Cross the best bid against the best ask while they are marketable.
    ///
    /// Each step trades `min(bid, ask)` remaining quantity, so at least
    /// one order is removed per step and the loop runs at most
    /// `bids.len() + asks.len()` times. Returns one report per step, in
    /// the order the crosses happened.
    pub fn match_orders(&mut self) -> Vec<TradeReport> {
        let mut trades = Vec::new();

        loop {
            let (Some(bid), Some(ask)) = (self.bids.front_mut(), self.asks.front_mut()) else {
                break;
            };

            if bid.price() < ask.price() {
                break;
            }

            let traded = bid.quantity().min(ask.quantity());
            bid.fill(traded);
            ask.fill(traded);

            debug!(
                quantity = traded,
                bid_price = bid.price(),
                ask_price = ask.price(),
                "matched"
            );

            trades.push(TradeReport {
                quantity: traded,
                bid_price: bid.price(),
                ask_price: ask.price(),
                buy_order_id: bid.id(),
                sell_order_id: ask.id(),
            });

            let bid_filled = bid.is_filled();
            let ask_filled = ask.is_filled();
            if bid_filled {
                self.bids.pop_front();
            }
            if ask_filled {
                self.asks.pop_front();
            }
        }

        self.debug_check_invariants();
        debug_assert!(!self.is_marketable(), "book still crossed after matching");
        trades
    }

    /// Resting buy orders in priority order.
    pub fn bids(&self) -> &VecDeque<Order> {
        &self.bids
    }

    /// Resting sell orders in priority order.
    pub fn asks(&self) -> &VecDeque<Order> {
        &self.asks
    }

    /// Resting orders on one side, in priority order.
    pub fn side(&self, side: Side) -> &VecDeque<Order> {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    pub fn best_bid(&self) -> Option<&Order> {
        self.bids.front()
    }

    pub fn best_ask(&self) -> Option<&Order> {
        self.asks.front()
    }

    /// Returns `true` if the top of book can cross.
    pub fn is_marketable(&self) -> bool {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => bid.price() >= ask.price(),
            _ => false,
        }
    }

    /// Number of resting orders on both sides.
    pub fn len(&self) -> usize {
        self.bids.len() + self.asks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// Return a simple snapshot of the current top-of-book.
    pub fn top_of_book(&self) -> TopOfBookSnapshot {
        TopOfBookSnapshot::new(self.best_bid(), self.best_ask())
    }

    /// Owned copy of both sides, for reporting.
    pub fn snapshot(&self) -> BookSnapshot {
        BookSnapshot {
            bids: self.bids.iter().cloned().collect(),
            asks: self.asks.iter().cloned().collect(),
        }
    }

    // -------------------------------------------------------------------------
    // Internal helpers
    // -------------------------------------------------------------------------

    fn side_mut(&mut self, side: Side) -> &mut VecDeque<Order> {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }

    fn debug_check_invariants(&self) {
        debug_assert!(is_sorted(Side::Buy, &self.bids), "bids out of priority order");
        debug_assert!(is_sorted(Side::Sell, &self.asks), "asks out of priority order");
        debug_assert!(self.bids.iter().all(|o| o.side() == Side::Buy));
        debug_assert!(self.asks.iter().all(|o| o.side() == Side::Sell));
        debug_assert!(
            self.bids.iter().chain(self.asks.iter()).all(|o| o.quantity() > 0.0),
            "filled or negative order resting in book"
        );
    }
}
