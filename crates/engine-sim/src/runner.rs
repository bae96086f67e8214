//! Top-level wiring of the polling loop.
//!
//! This module:
//! - Spawns the single engine task that owns the book.
//! - Polls the order source on a fixed cadence.
//! - Forwards each batch to the engine task.
//! - Stops on `max_cycles`, an exhausted source, or Ctrl-C.

use std::io::Write;

use anyhow::Context;
use tokio::sync::mpsc;
use tokio::time::{self, MissedTickBehavior};
use tracing::{info, warn};

use crate::config::Config;
use crate::engine_task;
use crate::order_source::FiniteSource;
use crate::reporter::Reporter;
use crate::types::{EngineRequest, EngineRx, EngineTx};

/// Run the polling loop with the given configuration and source.
///
/// Returns the reporter once the engine task has drained every batch.
pub async fn run<S, W>(config: &Config, mut source: S, reporter: Reporter<W>) -> anyhow::Result<Reporter<W>>
where
    S: FiniteSource,
    W: Write + Send + 'static,
{
    // Channel from producer → engine task.
    let (engine_tx, engine_rx): (EngineTx, EngineRx) = mpsc::unbounded_channel();

    // Spawn the central engine task.
    let engine_handle = tokio::spawn(engine_task::run_engine_loop(engine_rx, reporter));

    let mut ticker = time::interval(config.cycle_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(
        cycle_ms = config.cycle_ms,
        max_cycles = ?config.max_cycles,
        "polling loop started"
    );

    let mut batch_seq = 0u64;
    loop {
        if config.max_cycles.is_some_and(|max| batch_seq >= max) {
            info!(batch_seq, "cycle limit reached");
            break;
        }
        if source.is_exhausted() {
            info!(batch_seq, "order source exhausted");
            break;
        }

        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted, shutting down");
                break;
            }
        }

        batch_seq += 1;
        let orders = source.next_batch();
        if engine_tx.send(EngineRequest { batch_seq, orders }).is_err() {
            warn!(batch_seq, "engine task stopped early");
            break;
        }
    }

    // Closing the channel lets the engine task drain and exit.
    drop(engine_tx);

    let reporter = engine_handle
        .await
        .context("engine task panicked")?
        .context("failed to write cycle report")?;
    Ok(reporter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigOverrides, ReportFormat};
    use crate::order_source::{RandomFlow, RandomOrderSource, ReplayOrderSource};

    fn fast_config(max_cycles: Option<u64>, format: ReportFormat) -> Config {
        Config::default()
            .with_overrides(ConfigOverrides {
                cycle_ms: Some(1),
                max_cycles,
                format: Some(format),
                ..Default::default()
            })
            .unwrap()
    }

    #[tokio::test]
    async fn stops_after_max_cycles() {
        let config = fast_config(Some(3), ReportFormat::Json);
        let source = RandomOrderSource::new(RandomFlow::from(&config), 9);
        let reporter = Reporter::new(config.format, Vec::new());

        let reporter = run(&config, source, reporter).await.unwrap();
        let text = String::from_utf8(reporter.into_inner()).unwrap();
        let cycles: Vec<u64> = text
            .lines()
            .map(|l| serde_json::from_str::<serde_json::Value>(l).unwrap()["cycle"].as_u64().unwrap())
            .collect();
        assert_eq!(cycles, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn replay_runs_until_exhausted() {
        let config = fast_config(None, ReportFormat::Text);
        let input = "N, B, 30, 10\nN, S, 30, 10\nM\nN, S, 32, 10\nM\n";
        let source = ReplayOrderSource::from_reader(input.as_bytes()).unwrap();
        let reporter = Reporter::new(config.format, Vec::new());

        let reporter = run(&config, source, reporter).await.unwrap();
        let text = String::from_utf8(reporter.into_inner()).unwrap();

        let trades: Vec<&str> = text.lines().filter(|l| l.starts_with("T, ")).collect();
        assert_eq!(trades.len(), 1);
        assert!(trades[0].starts_with("T, 10, 30, 30, "));

        let resting: Vec<&str> = text.lines().filter(|l| l.starts_with("O, ")).collect();
        assert_eq!(resting.len(), 1);
        assert!(resting[0].contains(", S, 32, 10, "));
        assert!(text.contains("# cycle 2"));
        assert!(!text.contains("# cycle 3"));
    }
}
