//! engine-core
//!
//! Pure matching engine logic for a single instrument:
//! - order representation and validation
//! - price-time priority ordering
//! - the two-sided order book and its crossing loop
//! - the submit-then-match cycle driven by an order source

pub mod side;
pub mod error;
pub mod order;
pub mod priority;
pub mod messages;
pub mod top_of_book;
pub mod order_book;
pub mod matching_engine;

pub use side::Side;
pub use error::InvalidOrder;
pub use order::{Order, OrderId, Timestamp};
pub use priority::price_time_priority;

pub use messages::{CycleReport, NewOrder, Rejected, TradeReport};
pub use top_of_book::{BookSnapshot, TopOfBookSnapshot};

pub use order_book::OrderBook;
pub use matching_engine::{MatchingEngine, OrderSource};

// Re-exported so sources can build ids without a direct uuid dependency.
pub use uuid::Uuid;
