//! Sweep observer trait for progress reporting and report writing.

use crate::{RunFailure, RunSummary, SweepStats};

/// Callbacks invoked by [`Sweep::run`][crate::Sweep::run] during the commit
/// phase.  Calls arrive in input order even when runs were analyzed in
/// parallel.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
pub trait SweepObserver {
    /// Called once before the first run is committed.
    fn on_sweep_start(&mut self, _runs: usize) {}

    /// Called for each run that loaded completely.
    fn on_run_complete(&mut self, _summary: &RunSummary) {}

    /// Called for each run whose input could not be loaded.
    fn on_run_failed(&mut self, _failure: &RunFailure) {}

    /// Called once after every run has been committed.
    fn on_sweep_end(&mut self, _stats: &SweepStats) {}
}

/// A [`SweepObserver`] that does nothing.
pub struct NoopObserver;

impl SweepObserver for NoopObserver {}
