//! engine-sim
//!
//! Drives the matching engine core with simulated or replayed order
//! flow and prints each cycle to the console.

pub mod config;
pub mod order_source;
pub mod reporter;
pub mod runner;
pub mod types;

// internal, not re-exported
mod engine_task;
