//! The `Sweep` struct and its analyze/commit loop.

use fl_core::Step;
use fl_impact::WindowAggregator;
use fl_telemetry::read_summary;
use tracing::{debug, info, warn};

use crate::{RunFailure, RunSpec, RunSummary, SweepObserver, SweepResult};

/// Counts reported at the end of a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SweepStats {
    pub completed: usize,
    pub failed:    usize,
}

/// Window statistics for a batch of independent runs.
///
/// Create via [`SweepBuilder`][crate::SweepBuilder].
pub struct Sweep {
    pub(crate) runs:       Vec<RunSpec>,
    pub(crate) first_loss: Step,
    pub(crate) aggregator: WindowAggregator,
    pub(crate) threads:    Option<usize>,
}

impl Sweep {
    pub fn runs(&self) -> &[RunSpec] {
        &self.runs
    }

    /// First loss step shared by every run.
    pub fn first_loss(&self) -> Step {
        self.first_loss
    }

    /// Requested worker count, if any.
    pub fn threads(&self) -> Option<usize> {
        self.threads
    }

    /// Analyze every run, then commit outcomes to `observer` in input order.
    pub fn run<O: SweepObserver>(&self, observer: &mut O) -> SweepResult<SweepStats> {
        observer.on_sweep_start(self.runs.len());

        // ── Phase 1: analyze (produce) ────────────────────────────────────
        let outcomes = self.analyze_all()?;

        // ── Phase 2: commit (consume) ─────────────────────────────────────
        let mut stats = SweepStats::default();
        for outcome in outcomes {
            match outcome {
                Ok(summary) => {
                    stats.completed += 1;
                    observer.on_run_complete(&summary);
                }
                Err(failure) => {
                    stats.failed += 1;
                    warn!(
                        run = %failure.name,
                        path = %failure.summary.display(),
                        error = %failure.error,
                        "run skipped"
                    );
                    observer.on_run_failed(&failure);
                }
            }
        }

        info!(completed = stats.completed, failed = stats.failed, "sweep finished");
        observer.on_sweep_end(&stats);
        Ok(stats)
    }

    /// Analyze one run.  Pure: reads only its own summary file.
    pub fn analyze_run(&self, spec: &RunSpec) -> Result<RunSummary, RunFailure> {
        let run = read_summary(&spec.summary).map_err(|error| RunFailure {
            name:    spec.name.clone(),
            summary: spec.summary.clone(),
            error,
        })?;
        debug!(run = %spec.name, records = run.len(), "run loaded");

        Ok(RunSummary {
            name:    spec.name.clone(),
            summary: spec.summary.clone(),
            records: run.len(),
            windows: self.aggregator.aggregate(&run, self.first_loss),
        })
    }

    #[cfg(not(feature = "parallel"))]
    fn analyze_all(&self) -> SweepResult<Vec<Result<RunSummary, RunFailure>>> {
        if let Some(threads) = self.threads {
            debug!(threads, "built without the parallel feature; analyzing sequentially");
        }
        Ok(self.runs.iter().map(|spec| self.analyze_run(spec)).collect())
    }

    #[cfg(feature = "parallel")]
    fn analyze_all(&self) -> SweepResult<Vec<Result<RunSummary, RunFailure>>> {
        use rayon::prelude::*;

        // Indexed parallel collect preserves input order.
        let analyze = || -> Vec<Result<RunSummary, RunFailure>> {
            self.runs.par_iter().map(|spec| self.analyze_run(spec)).collect()
        };

        match self.threads {
            None => Ok(analyze()),
            Some(n) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| crate::SweepError::ThreadPool(e.to_string()))?;
                Ok(pool.install(analyze))
            }
        }
    }
}
