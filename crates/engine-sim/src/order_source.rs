//! Order sources feeding the engine.
//!
//! - [`RandomOrderSource`]: seeded random flow, reproducible per seed.
//! - [`ReplayOrderSource`]: batches read from a CSV file, split on `M`
//!   lines.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::ops::Range;
use std::path::Path;

use engine_core::{NewOrder, OrderSource, Side};
use engine_protocol::{parse_order_line, ParseError, Record};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::debug;
use uuid::Builder;

use crate::config::Config;

/// A source that may run dry.
pub trait FiniteSource: OrderSource {
    /// Returns `true` once no further batches will be produced.
    fn is_exhausted(&self) -> bool;
}

/// Parameters of the random flow.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomFlow {
    /// Each batch holds `0..=max_batch` orders.
    pub max_batch: usize,
    pub price: Range<f64>,
    pub quantity: Range<f64>,
}

impl From<&Config> for RandomFlow {
    fn from(config: &Config) -> Self {
        RandomFlow {
            max_batch: config.max_batch,
            price: config.price_min..config.price_max,
            quantity: config.qty_min..config.qty_max,
        }
    }
}

/// Random buy/sell flow driven by an explicitly seeded RNG.
#[derive(Debug)]
pub struct RandomOrderSource {
    flow: RandomFlow,
    rng: StdRng,
}

impl RandomOrderSource {
    pub fn new(flow: RandomFlow, seed: u64) -> Self {
        RandomOrderSource {
            flow,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draw a single order request.
    pub fn next_order(&mut self) -> NewOrder {
        let side = if self.rng.gen_bool(0.5) {
            Side::Buy
        } else {
            Side::Sell
        };
        let price = self.rng.gen_range(self.flow.price.clone());
        let quantity = self.rng.gen_range(self.flow.quantity.clone());
        let id = Builder::from_random_bytes(self.rng.gen()).into_uuid();

        NewOrder {
            id,
            side,
            price,
            quantity,
        }
    }
}

impl OrderSource for RandomOrderSource {
    fn next_batch(&mut self) -> Vec<NewOrder> {
        let count = self.rng.gen_range(0..=self.flow.max_batch);
        (0..count).map(|_| self.next_order()).collect()
    }
}

impl FiniteSource for RandomOrderSource {
    fn is_exhausted(&self) -> bool {
        false
    }
}

/// A replay file that could not be loaded.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("failed to read replay input: {0}")]
    Io(#[from] io::Error),

    #[error("line {line}: {source}")]
    Parse { line: usize, source: ParseError },
}

/// Pre-recorded batches, loaded up front.
#[derive(Debug, Default)]
pub struct ReplayOrderSource {
    batches: VecDeque<Vec<NewOrder>>,
}

impl ReplayOrderSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ReplayError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Read every line; each `M` closes the current batch, and trailing
    /// orders after the last `M` form a final batch.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, ReplayError> {
        let mut batches = VecDeque::new();
        let mut current = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            match parse_order_line(&line) {
                Ok(Some(Record::Order(order))) => current.push(order),
                Ok(Some(Record::Match)) => batches.push_back(std::mem::take(&mut current)),
                Ok(None) => {}
                Err(source) => {
                    return Err(ReplayError::Parse {
                        line: idx + 1,
                        source,
                    })
                }
            }
        }
        if !current.is_empty() {
            batches.push_back(current);
        }

        debug!(batches = batches.len(), "replay loaded");
        Ok(ReplayOrderSource { batches })
    }

    /// Number of batches not yet handed out.
    pub fn remaining(&self) -> usize {
        self.batches.len()
    }
}

impl OrderSource for ReplayOrderSource {
    fn next_batch(&mut self) -> Vec<NewOrder> {
        self.batches.pop_front().unwrap_or_default()
    }
}

impl FiniteSource for ReplayOrderSource {
    fn is_exhausted(&self) -> bool {
        self.batches.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flow() -> RandomFlow {
        RandomFlow::from(&Config::default())
    }

    #[test]
    fn same_seed_same_stream() {
        let mut a = RandomOrderSource::new(flow(), 42);
        let mut b = RandomOrderSource::new(flow(), 42);
        for _ in 0..20 {
            assert_eq!(a.next_batch(), b.next_batch());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = RandomOrderSource::new(flow(), 1);
        let mut b = RandomOrderSource::new(flow(), 2);
        let left: Vec<_> = (0..10).map(|_| a.next_order()).collect();
        let right: Vec<_> = (0..10).map(|_| b.next_order()).collect();
        assert_ne!(left, right);
    }

    #[test]
    fn random_orders_stay_in_range() {
        let flow = flow();
        let mut source = RandomOrderSource::new(flow.clone(), 7);
        for _ in 0..50 {
            let batch = source.next_batch();
            assert!(batch.len() <= flow.max_batch);
            for order in batch {
                assert!(flow.price.contains(&order.price));
                assert!(flow.quantity.contains(&order.quantity));
                assert_eq!(order.id.get_version_num(), 4);
            }
        }
        assert!(!source.is_exhausted());
    }

    #[test]
    fn replay_splits_batches_on_match_lines() {
        let input = "\
# two batches
N, B, 30, 10
N, S, 31, 5
M
N, S, 29, 1
";
        let mut source = ReplayOrderSource::from_reader(input.as_bytes()).unwrap();
        assert_eq!(source.remaining(), 2);

        let first = source.next_batch();
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].side, Side::Buy);
        assert_eq!(first[1].price, 31.0);

        let second = source.next_batch();
        assert_eq!(second.len(), 1);
        assert!(source.is_exhausted());
        assert!(source.next_batch().is_empty());
    }

    #[test]
    fn replay_keeps_empty_batches() {
        let source = ReplayOrderSource::from_reader("M\nM\n".as_bytes()).unwrap();
        assert_eq!(source.remaining(), 2);
    }

    #[test]
    fn replay_reports_line_numbers() {
        let err = ReplayOrderSource::from_reader("N, B, 30, 1\n\nN, B, x, 1\n".as_bytes())
            .unwrap_err();
        match err {
            ReplayError::Parse { line, source } => {
                assert_eq!(line, 3);
                assert!(matches!(source, ParseError::InvalidNumber { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
