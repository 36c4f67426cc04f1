//! `SweepOutputObserver<W>`: bridges `SweepObserver` to a `ReportWriter`.

use fl_sweep::{RunFailure, RunSummary, SweepObserver, SweepStats};

use crate::writer::ReportWriter;
use crate::{OutputError, OutputResult};

/// A [`SweepObserver`] that writes the cross-run window table.
///
/// Rows are collected as runs are committed and written in one table when
/// the sweep ends, so a sweep that errors out early leaves no half-written
/// table behind.  Failed runs get no row; their names are kept for the
/// caller to report.
///
/// Errors from the writer are stored internally because `SweepObserver`
/// methods have no return value.  After `sweep.run()` returns, check with
/// [`take_error`][Self::take_error].
pub struct SweepOutputObserver<W: ReportWriter> {
    writer:     W,
    rows:       Vec<RunSummary>,
    failed:     Vec<String>,
    last_error: Option<OutputError>,
}

impl<W: ReportWriter> SweepOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            rows:       Vec::new(),
            failed:     Vec::new(),
            last_error: None,
        }
    }

    /// Take the stored write error (if any) after `sweep.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Names of runs that produced no row.
    pub fn failed_runs(&self) -> &[String] {
        &self.failed
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: ReportWriter> SweepObserver for SweepOutputObserver<W> {
    fn on_sweep_start(&mut self, runs: usize) {
        self.rows.reserve(runs);
    }

    fn on_run_complete(&mut self, summary: &RunSummary) {
        self.rows.push(summary.clone());
    }

    fn on_run_failed(&mut self, failure: &RunFailure) {
        self.failed.push(failure.name.clone());
    }

    fn on_sweep_end(&mut self, _stats: &SweepStats) {
        let result = self.writer.write_windows(&self.rows);
        self.store_err(result);
        let result = self.writer.finish();
        self.store_err(result);
    }
}
