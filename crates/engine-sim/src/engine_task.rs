//! Central engine loop.
//!
//! This task owns the `MatchingEngine` instance and processes every
//! `EngineRequest` coming from the producer, so the book has exactly
//! one writer no matter where batches originate.

use std::io::{self, Write};

use engine_core::MatchingEngine;
use tracing::{debug, info};

use crate::reporter::Reporter;
use crate::types::{EngineRequest, EngineRx};

/// Run the central engine processing loop until the request channel
/// closes.
///
/// Returns the reporter so the caller can recover its sink; a write
/// failure on the sink stops the loop.
pub async fn run_engine_loop<W: Write>(
    mut engine_rx: EngineRx,
    mut reporter: Reporter<W>,
) -> io::Result<Reporter<W>> {
    let mut engine = MatchingEngine::new();

    while let Some(req) = engine_rx.recv().await {
        let EngineRequest { batch_seq, orders } = req;
        debug!(batch_seq, orders = orders.len(), "batch received");

        let report = engine.run_cycle(orders);
        reporter.report(&report)?;
    }

    info!(
        cycles = engine.cycles(),
        resting = engine.book().len(),
        "engine loop shutting down (engine_rx closed)"
    );
    Ok(reporter)
}
