//! Fluent builder for constructing a [`Sweep`].

use std::path::{Path, PathBuf};

use fl_core::{AnalysisConfig, Step};
use fl_events::extract_loss_steps;
use fl_impact::WindowAggregator;
use fl_telemetry::read_loss_schedule;
use tracing::debug;

use crate::{RunSpec, Sweep, SweepResult};

/// Fluent builder for [`Sweep`].
///
/// # Optional inputs (have defaults)
///
/// | Method                  | Default                                    |
/// |-------------------------|--------------------------------------------|
/// | `.runs(iter)`           | No runs (the report is header-only)        |
/// | `.loss_schedule(path)`  | No schedule                                |
/// | `.first_loss(step)`     | First schedule step, else step 0           |
/// | `.threads(n)`           | All logical cores (`parallel` feature)     |
///
/// All runs share one first-loss step: a seed sweep replays the same loss
/// schedule with different spare timing.
pub struct SweepBuilder {
    config:     AnalysisConfig,
    runs:       Vec<RunSpec>,
    schedule:   Option<PathBuf>,
    first_loss: Option<Step>,
    threads:    Option<usize>,
}

impl SweepBuilder {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            runs:       Vec::new(),
            schedule:   None,
            first_loss: None,
            threads:    None,
        }
    }

    /// Append runs to the sweep.  Report rows keep this order.
    pub fn runs(mut self, runs: impl IntoIterator<Item = RunSpec>) -> Self {
        self.runs.extend(runs);
        self
    }

    /// Take the first loss step from this schedule.  A missing file means no
    /// losses.
    pub fn loss_schedule(mut self, path: &Path) -> Self {
        self.schedule = Some(path.to_path_buf());
        self
    }

    /// Use an explicit first-loss step.  Overrides `loss_schedule`.
    pub fn first_loss(mut self, step: Step) -> Self {
        self.first_loss = Some(step);
        self
    }

    /// Worker thread count for the analyze phase.  Ignored without the
    /// `parallel` feature.
    pub fn threads(mut self, n: usize) -> Self {
        self.threads = Some(n);
        self
    }

    /// Validate the configuration, resolve the first loss step, and return a
    /// ready-to-run [`Sweep`].
    pub fn build(self) -> SweepResult<Sweep> {
        self.config.validate()?;

        let first_loss = match (self.first_loss, &self.schedule) {
            (Some(step), _) => step,
            (None, Some(path)) => {
                let losses = extract_loss_steps(&read_loss_schedule(path)?);
                losses.first().unwrap_or(Step::ZERO)
            }
            (None, None) => Step::ZERO,
        };
        debug!(first_loss = first_loss.0, runs = self.runs.len(), "sweep configured");

        Ok(Sweep {
            runs:       self.runs,
            first_loss,
            aggregator: WindowAggregator::new(self.config.end_fraction),
            threads:    self.threads,
        })
    }
}
