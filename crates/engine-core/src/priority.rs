//! Price-time priority within one side of the book.
//!
//! - Bids: higher price first, then older first.
//! - Asks: lower price first, then older first.

use std::cmp::Ordering;

use crate::order::Order;
use crate::side::Side;

/// Rank `a` against `b` on the given side.
///
/// `Ordering::Less` means `a` has priority over `b`. Prices use IEEE
/// total ordering; validated prices are always finite and positive.
pub fn price_time_priority(side: Side, a: &Order, b: &Order) -> Ordering {
    let by_price = match side {
        Side::Buy => b.price().total_cmp(&a.price()),
        Side::Sell => a.price().total_cmp(&b.price()),
    };
    by_price.then_with(|| a.timestamp_ns().cmp(&b.timestamp_ns()))
}

/// Returns `true` if `orders` is in priority order for `side`.
pub fn is_sorted<'a, I>(side: Side, orders: I) -> bool
where
    I: IntoIterator<Item = &'a Order>,
{
    let mut iter = orders.into_iter();
    let Some(mut prev) = iter.next() else {
        return true;
    };
    for next in iter {
        if price_time_priority(side, prev, next) == Ordering::Greater {
            return false;
        }
        prev = next;
    }
    true
}
