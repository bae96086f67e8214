//! JSON report codec.
//!
//! Each [`CycleReport`] becomes a single JSON object on one line, so a
//! stream of cycles can be consumed as JSON Lines.

use engine_core::CycleReport;

/// Encode a cycle report as a single-line JSON document.
pub fn format_cycle_json(report: &CycleReport) -> Result<String, serde_json::Error> {
    serde_json::to_string(report)
}
