//! The `ReportWriter` trait implemented by report backends.

use fl_core::StepClock;
use fl_events::Timeline;
use fl_impact::ImpactRow;
use fl_sweep::RunSummary;

use crate::{OutputResult, Preamble};

/// A sink for the three report tables.
///
/// Each `write_*` call emits one complete table including its header, so an
/// impact report is `write_preamble` followed by `write_impact`.
pub trait ReportWriter {
    /// Write `key value` lines followed by a blank line.  Writes nothing for
    /// an empty preamble.
    fn write_preamble(&mut self, preamble: &Preamble) -> OutputResult<()>;

    /// One row per loss step, ascending.
    fn write_impact(&mut self, rows: &[ImpactRow]) -> OutputResult<()>;

    /// Event table, blank line, then the loss → next-spare table.  Time
    /// columns stay empty without a clock.
    fn write_timeline(&mut self, timeline: &Timeline, clock: Option<StepClock>) -> OutputResult<()>;

    /// One row per run, in the given order.
    fn write_windows(&mut self, runs: &[RunSummary]) -> OutputResult<()>;

    /// Flush the underlying sink.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
