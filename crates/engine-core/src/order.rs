//! Internal order representation used inside the order book.
//!
//! An `Order` carries:
//! - `id`: opaque identifier chosen by the order source
//! - `side`, `price`: fixed at construction
//! - `quantity`: remaining unfilled quantity, reduced by fills
//! - `timestamp_ns`: monotonic creation time, used only for time priority

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::InvalidOrder;
use crate::side::Side;

/// Unique identifier for an order.
pub type OrderId = Uuid;

/// Nanoseconds since the Unix epoch.
pub type Timestamp = u64;

/// Last timestamp handed out by [`Order::current_timestamp_ns`].
static LAST_TIMESTAMP_NS: AtomicU64 = AtomicU64::new(0);

/// A single order in the book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    side: Side,
    price: f64,
    quantity: f64,
    timestamp_ns: Timestamp,
}

impl Order {
    /// Construct an order stamped with the current monotonic time.
    pub fn new(id: OrderId, side: Side, price: f64, quantity: f64) -> Result<Self, InvalidOrder> {
        Self::with_timestamp(id, side, price, quantity, Self::current_timestamp_ns())
    }

    /// Construct an order with an explicit timestamp.
    pub fn with_timestamp(
        id: OrderId,
        side: Side,
        price: f64,
        quantity: f64,
        timestamp_ns: Timestamp,
    ) -> Result<Self, InvalidOrder> {
        let order = Order {
            id,
            side,
            price,
            quantity,
            timestamp_ns,
        };
        order.validate()?;
        Ok(order)
    }

    /// Check that price and remaining quantity are positive and finite.
    ///
    /// Constructors already do this; it matters for orders that arrive
    /// through deserialization.
    pub fn validate(&self) -> Result<(), InvalidOrder> {
        if !(self.price.is_finite() && self.price > 0.0) {
            return Err(InvalidOrder::NonPositivePrice(self.price));
        }
        if !(self.quantity.is_finite() && self.quantity > 0.0) {
            return Err(InvalidOrder::NonPositiveQuantity(self.quantity));
        }
        Ok(())
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    /// Remaining unfilled quantity.
    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    pub fn timestamp_ns(&self) -> Timestamp {
        self.timestamp_ns
    }

    /// Returns `true` if the order is fully filled.
    pub fn is_filled(&self) -> bool {
        self.quantity == 0.0
    }

    /// Fill the order by up to `qty` units.
    ///
    /// Returns the quantity that was actually filled (which will be
    /// `<= qty` and `<= quantity`). Filling by exactly the remaining
    /// quantity leaves it at exactly zero.
    pub fn fill(&mut self, qty: f64) -> f64 {
        let filled = qty.min(self.quantity).max(0.0);
        self.quantity -= filled;
        debug_assert!(self.quantity >= 0.0, "negative remaining quantity on {}", self.id);
        filled
    }

    /// Current time in nanoseconds since the Unix epoch, forced to be
    /// strictly greater than any value previously returned in this
    /// process.
    pub fn current_timestamp_ns() -> Timestamp {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        let wall = now
            .as_secs()
            .saturating_mul(1_000_000_000)
            .saturating_add(now.subsec_nanos() as u64);

        let mut last = LAST_TIMESTAMP_NS.load(Ordering::Relaxed);
        loop {
            let next = wall.max(last.saturating_add(1));
            match LAST_TIMESTAMP_NS.compare_exchange_weak(
                last,
                next,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return next,
                Err(actual) => last = actual,
            }
        }
    }
}
