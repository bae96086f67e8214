//! Error types for the core matching engine.
//!
//! The book operations themselves are total over well-formed orders;
//! the only failure the core reports is a malformed order, raised at
//! construction (or re-validation) time.

use thiserror::Error;

/// An order whose price or quantity cannot be ranked or matched.
///
/// Callers recover locally by not submitting the order; it never
/// affects the state of a book.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum InvalidOrder {
    /// Price is zero, negative, or not a finite number.
    #[error("invalid order: price must be positive and finite, got {0}")]
    NonPositivePrice(f64),

    /// Quantity is zero, negative, or not a finite number.
    #[error("invalid order: quantity must be positive and finite, got {0}")]
    NonPositiveQuantity(f64),
}
