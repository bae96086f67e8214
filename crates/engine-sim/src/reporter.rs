//! Console reporting of each engine cycle.

use std::io::{self, Write};

use engine_core::CycleReport;
use engine_protocol::{format_cycle, format_cycle_json};

use crate::config::ReportFormat;

/// Writes cycle reports to a sink in the configured format.
#[derive(Debug)]
pub struct Reporter<W> {
    format: ReportFormat,
    out: W,
}

impl<W: Write> Reporter<W> {
    pub fn new(format: ReportFormat, out: W) -> Self {
        Reporter { format, out }
    }

    /// Write one cycle and flush, so each cycle is visible as soon as
    /// it completes.
    pub fn report(&mut self, report: &CycleReport) -> io::Result<()> {
        match self.format {
            ReportFormat::Text => {
                for line in format_cycle(report) {
                    writeln!(self.out, "{line}")?;
                }
            }
            ReportFormat::Json => {
                let line = format_cycle_json(report)?;
                writeln!(self.out, "{line}")?;
            }
        }
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
