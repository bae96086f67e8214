//! Engine cycle orchestration over a single [`OrderBook`].
//!
//! One cycle is:
//! 1. turn every request from the source into an [`Order`] (rejecting
//!    malformed ones),
//! 2. submit the valid orders in arrival order,
//! 3. run one match pass,
//! 4. capture the resting book for the reporter.
//!
//! Scheduling (how often a cycle runs, where batches come from) is left
//! to the caller; the engine itself is synchronous and single-owner.

use tracing::{info, warn};

use crate::messages::{CycleReport, NewOrder, Rejected};
use crate::order::Order;
use crate::order_book::OrderBook;

/// A producer of order requests, polled once per cycle.
///
/// An empty batch is a valid, quiet cycle.
pub trait OrderSource {
    fn next_batch(&mut self) -> Vec<NewOrder>;
}

impl<F> OrderSource for F
where
    F: FnMut() -> Vec<NewOrder>,
{
    fn next_batch(&mut self) -> Vec<NewOrder> {
        self()
    }
}

/// Owns the book and the cycle counter.
#[derive(Debug, Default)]
pub struct MatchingEngine {
    book: OrderBook,
    cycles: u64,
}

impl MatchingEngine {
    /// Create a new, empty matching engine.
    pub fn new() -> Self {
        MatchingEngine::default()
    }

    /// Run one submit-all-then-match cycle over `batch`.
    pub fn run_cycle(&mut self, batch: Vec<NewOrder>) -> CycleReport {
        self.cycles += 1;

        let mut accepted = Vec::with_capacity(batch.len());
        let mut rejected = Vec::new();

        for request in batch {
            match Order::new(request.id, request.side, request.price, request.quantity)
                .and_then(|order| {
                    self.book.submit(order.clone())?;
                    Ok(order)
                }) {
                Ok(order) => accepted.push(order),
                Err(reason) => {
                    warn!(id = %request.id, %reason, "order rejected");
                    rejected.push(Rejected { request, reason });
                }
            }
        }

        let trades = self.book.match_orders();
        let book = self.book.snapshot();

        info!(
            cycle = self.cycles,
            accepted = accepted.len(),
            rejected = rejected.len(),
            trades = trades.len(),
            resting_bids = book.bids.len(),
            resting_asks = book.asks.len(),
            "cycle complete"
        );

        CycleReport {
            cycle: self.cycles,
            accepted,
            rejected,
            trades,
            book,
        }
    }

    /// Pull one batch from `source` and run a cycle over it.
    pub fn poll<S>(&mut self, source: &mut S) -> CycleReport
    where
        S: OrderSource + ?Sized,
    {
        let batch = source.next_batch();
        self.run_cycle(batch)
    }

    /// Read-only access to the book, for reporting.
    pub fn book(&self) -> &OrderBook {
        &self.book
    }

    /// Number of cycles run so far.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }
}
