//! Windowed run statistics for cross-run comparison.
//!
//! Three windows per run, relative to the first loss step `F` and the run
//! length `T = last_step + 1`:
//!
//! ```text
//! pre   [0, F)
//! post  [F + 1, T)
//! end   [ceil(end_fraction * T), T)
//! ```
//!
//! `pre` and `post` never overlap (step `F` itself belongs to neither); `end`
//! is a tail of the run and normally lies inside `post`.

use fl_core::Step;
use fl_telemetry::{Run, SummaryRecord};

/// Means of the four summary metrics over one window.
///
/// An empty window has `count == 0` and every mean `None`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WindowStats {
    pub mean_v:   Option<f64>,
    pub std_v:    Option<f64>,
    pub mean_gap: Option<f64>,
    pub std_gap:  Option<f64>,
    pub count:    usize,
}

impl WindowStats {
    pub fn from_records(records: &[SummaryRecord]) -> Self {
        Self {
            mean_v:   mean(records, |r| r.mean_v),
            std_v:    mean(records, |r| r.std_v),
            mean_gap: mean(records, |r| r.mean_gap),
            std_gap:  mean(records, |r| r.std_gap),
            count:    records.len(),
        }
    }
}

/// The three windows of one run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RunWindows {
    pub first_loss: Step,
    pub pre:        WindowStats,
    pub post:       WindowStats,
    pub end:        WindowStats,
}

/// Computes [`RunWindows`].  Never fails: runs with no or late losses simply
/// produce empty windows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowAggregator {
    end_fraction: f64,
}

impl Default for WindowAggregator {
    fn default() -> Self {
        Self { end_fraction: 0.8 }
    }
}

impl WindowAggregator {
    /// `end_fraction` is clamped to `[0, 1]`.
    pub fn new(end_fraction: f64) -> Self {
        Self { end_fraction: end_fraction.clamp(0.0, 1.0) }
    }

    pub fn aggregate(&self, run: &Run, first_loss: Step) -> RunWindows {
        let end = Step(run.total_steps());
        RunWindows {
            first_loss,
            pre:  WindowStats::from_records(run.range(Step::ZERO, first_loss)),
            post: WindowStats::from_records(run.range(first_loss.offset(1), end)),
            end:  WindowStats::from_records(run.range(self.end_start(run.total_steps()), end)),
        }
    }

    /// First step of the end window: `ceil(end_fraction * total_steps)`.
    pub fn end_start(&self, total_steps: u64) -> Step {
        let raw = self.end_fraction * total_steps as f64;
        // 0.8 * 15 must give 12, not 13 from a representation error.
        let nearest = raw.round();
        let start = if (raw - nearest).abs() < 1e-9 { nearest } else { raw.ceil() };
        Step(start as u64)
    }
}

fn mean(records: &[SummaryRecord], field: impl Fn(&SummaryRecord) -> f64) -> Option<f64> {
    if records.is_empty() {
        return None;
    }
    Some(records.iter().map(field).sum::<f64>() / records.len() as f64)
}
