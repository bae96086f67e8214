// crates/engine-core/tests/book_properties.rs
use engine_core::priority::is_sorted;
use engine_core::{Order, OrderBook, Side, Uuid};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Submit { side: Side, price_ticks: u32, qty_tenths: u32 },
    Match,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (any::<bool>(), 270u32..=350, 1u32..=250).prop_map(|(buy, price_ticks, qty_tenths)| {
            Op::Submit {
                side: if buy { Side::Buy } else { Side::Sell },
                price_ticks,
                qty_tenths,
            }
        }),
        1 => Just(Op::Match),
    ]
}

fn check_sorted(book: &OrderBook) -> Result<(), TestCaseError> {
    prop_assert!(is_sorted(Side::Buy, book.bids()));
    prop_assert!(is_sorted(Side::Sell, book.asks()));
    Ok(())
}

fn total(orders: &std::collections::VecDeque<Order>) -> f64 {
    orders.iter().map(Order::quantity).sum()
}

proptest! {
    #[test]
    fn book_invariants_hold_for_any_sequence(ops in prop::collection::vec(op(), 1..80)) {
        let mut book = OrderBook::new();
        let mut ts = 0u64;

        for op in ops {
            match op {
                Op::Submit { side, price_ticks, qty_tenths } => {
                    ts += 1;
                    let order = Order::with_timestamp(
                        Uuid::new_v4(),
                        side,
                        f64::from(price_ticks) / 10.0,
                        f64::from(qty_tenths) / 10.0,
                        ts,
                    ).unwrap();
                    book.submit(order).unwrap();
                    check_sorted(&book)?;
                }
                Op::Match => {
                    let bids_before = total(book.bids());
                    let asks_before = total(book.asks());
                    let resting_before = book.len();

                    let trades = book.match_orders();
                    check_sorted(&book)?;

                    // Termination bound.
                    prop_assert!(trades.len() <= resting_before);

                    // No residual zero orders.
                    prop_assert!(book.bids().iter().all(|o| o.quantity() > 0.0));
                    prop_assert!(book.asks().iter().all(|o| o.quantity() > 0.0));

                    // Every cross is marketable and positive.
                    for t in &trades {
                        prop_assert!(t.bid_price >= t.ask_price);
                        prop_assert!(t.quantity > 0.0);
                    }

                    // Both sides lose the same quantity.
                    let traded: f64 = trades.iter().map(|t| t.quantity).sum();
                    let bid_decrease = bids_before - total(book.bids());
                    let ask_decrease = asks_before - total(book.asks());
                    prop_assert!((bid_decrease - traded).abs() < 1e-6);
                    prop_assert!((ask_decrease - traded).abs() < 1e-6);

                    // No-cross post-condition.
                    if let (Some(bid), Some(ask)) = (book.best_bid(), book.best_ask()) {
                        prop_assert!(bid.price() < ask.price());
                    }

                    // A second pass is a no-op.
                    let snapshot = book.snapshot();
                    prop_assert!(book.match_orders().is_empty());
                    prop_assert_eq!(book.snapshot(), snapshot);
                }
            }
        }
    }

    #[test]
    fn each_cross_trades_the_smaller_top_quantity(
        bid_qty in 1u32..=100,
        ask_qty in 1u32..=100,
    ) {
        let mut book = OrderBook::new();
        let bid = f64::from(bid_qty);
        let ask = f64::from(ask_qty);
        book.submit(Order::with_timestamp(Uuid::new_v4(), Side::Buy, 30.0, bid, 1).unwrap()).unwrap();
        book.submit(Order::with_timestamp(Uuid::new_v4(), Side::Sell, 30.0, ask, 2).unwrap()).unwrap();

        let trades = book.match_orders();
        prop_assert_eq!(trades.len(), 1);
        prop_assert_eq!(trades[0].quantity, bid.min(ask));
        prop_assert_eq!(book.len(), if bid_qty == ask_qty { 0 } else { 1 });
    }
}
