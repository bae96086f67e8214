//! Shared types for the simulation runner.
//!
//! This module defines:
//! - `EngineRequest`: one batch flowing from the producer to the engine
//! - channel aliases between the producer and the engine task

use engine_core::NewOrder;
use tokio::sync::mpsc;

/// One cycle's worth of order requests.
#[derive(Debug)]
pub struct EngineRequest {
    /// Sequence number assigned by the producer (1-based).
    pub batch_seq: u64,
    pub orders: Vec<NewOrder>,
}

/// Channel from producer → engine task.
pub type EngineTx = mpsc::UnboundedSender<EngineRequest>;
pub type EngineRx = mpsc::UnboundedReceiver<EngineRequest>;
