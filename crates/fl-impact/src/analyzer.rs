//! `ImpactAnalyzer`: baseline, peak rebound, slope, and recovery per loss.

use fl_core::{AnalysisConfig, ImpactParams, Nominal, Step};
use fl_events::StepSet;
use fl_telemetry::{Run, StepIndex, SummaryRecord};
use tracing::debug;

use crate::{ImpactError, ImpactResult};

// ── Output rows ───────────────────────────────────────────────────────────────

/// Highest `mean_v` inside the peak search horizon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    pub step: Step,
    pub v:    f64,
}

/// Metrics for one loss step.  `None` means undefined for this loss.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactRow {
    pub loss_step:      Step,
    pub baseline_v:     Option<f64>,
    pub baseline_gap:   Option<f64>,
    pub peak:           Option<Peak>,
    /// `peak.v - baseline_v`
    pub delta_v:        Option<f64>,
    /// Mean speed change per step over `slope_window` steps after the loss.
    pub slope:          Option<f64>,
    /// `hit - (min_consecutive - 1)`, where `hit` is the record completing
    /// the earliest qualifying in-tolerance run.
    pub recovery_step:  Option<Step>,
    /// `recovery_step - loss_step`.  Never negative: the run's records lie at
    /// distinct steps `>= loss_step`, so `hit >= loss_step + min_consecutive - 1`.
    pub recovery_delay: Option<i64>,
}

// ── ImpactAnalyzer ────────────────────────────────────────────────────────────

/// Computes [`ImpactRow`]s for every loss step of a run.
///
/// Holds only parameters; the run is passed to each call, so one analyzer
/// can be reused across runs that share `V` and `d*`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactAnalyzer {
    params:  ImpactParams,
    nominal: Nominal,
}

impl ImpactAnalyzer {
    pub fn new(params: ImpactParams, nominal: Nominal) -> Self {
        Self { params, nominal }
    }

    /// Build an analyzer for `run`, inferring any nominal value `config` does
    /// not give from the run's first record.
    pub fn for_run(config: &AnalysisConfig, run: &Run) -> ImpactResult<Self> {
        let first = run.first().ok_or(ImpactError::EmptyRun)?;
        let nominal = config.resolve_nominal(first.mean_v, first.mean_gap);
        debug!(v = nominal.speed, d_star = nominal.spacing, "resolved nominal values");
        Ok(Self::new(config.impact_params(), nominal))
    }

    pub fn params(&self) -> &ImpactParams {
        &self.params
    }

    pub fn nominal(&self) -> Nominal {
        self.nominal
    }

    /// Analyze every loss step in ascending order.
    ///
    /// Returns [`ImpactError::NoEvents`] when `losses` is empty.
    pub fn analyze(&self, run: &Run, losses: &StepSet) -> ImpactResult<Vec<ImpactRow>> {
        if losses.is_empty() {
            return Err(ImpactError::NoEvents);
        }
        let index = run.index_by_step();
        Ok(losses
            .iter()
            .map(|loss| self.analyze_loss(run, &index, loss))
            .collect())
    }

    /// Metrics for a single loss step.
    pub fn analyze_loss(&self, run: &Run, index: &StepIndex<'_>, loss: Step) -> ImpactRow {
        let (baseline_v, baseline_gap) = match self.baseline(run, index, loss) {
            Some((v, g)) => (Some(v), Some(g)),
            None => (None, None),
        };
        let peak = self.peak(run, loss);
        let delta_v = match (peak, baseline_v) {
            (Some(p), Some(b)) => Some(p.v - b),
            _ => None,
        };
        let recovery_step = self.recovery_step(run, loss);

        ImpactRow {
            loss_step: loss,
            baseline_v,
            baseline_gap,
            peak,
            delta_v,
            slope: self.slope(index, loss),
            recovery_step,
            recovery_delay: recovery_step.map(|r| r.signed_since(loss)),
        }
    }

    // ── Individual metrics ────────────────────────────────────────────────

    /// Mean `(mean_v, mean_gap)` over the records in `[L - pre, L)`.
    ///
    /// Falls back to the record at `L` when the window holds no records, and
    /// to `None` when that is missing too.
    pub fn baseline(&self, run: &Run, index: &StepIndex<'_>, loss: Step) -> Option<(f64, f64)> {
        let window = run.range(loss.back(self.params.pre), loss);
        if window.is_empty() {
            return index.get(loss).map(|r| (r.mean_v, r.mean_gap));
        }
        let n = window.len() as f64;
        let v = window.iter().map(|r| r.mean_v).sum::<f64>() / n;
        let g = window.iter().map(|r| r.mean_gap).sum::<f64>() / n;
        Some((v, g))
    }

    /// Highest `mean_v` in `[L, L + post]`.  Ties keep the earliest step.
    pub fn peak(&self, run: &Run, loss: Step) -> Option<Peak> {
        let horizon = run.range(loss, loss.offset(self.params.post).offset(1));
        let mut best: Option<Peak> = None;
        for r in horizon {
            if best.is_none_or(|b| r.mean_v > b.v) {
                best = Some(Peak { step: r.step, v: r.mean_v });
            }
        }
        best
    }

    /// `(v(L + w) - v(L)) / w`, defined only when both records exist.
    pub fn slope(&self, index: &StepIndex<'_>, loss: Step) -> Option<f64> {
        let w = self.params.slope_window;
        if w == 0 {
            return None;
        }
        let start = index.get(loss)?;
        let end = index.get(loss.offset(w))?;
        Some((end.mean_v - start.mean_v) / w as f64)
    }

    /// Start of the first run of `min_consecutive` in-tolerance records at or
    /// after `loss`, counted back in steps from the record that completes it.
    /// On a dense summary this is the run's first record.
    ///
    /// Any out-of-tolerance record resets the run.  If no run reaches the
    /// threshold before the data ends, recovery is undefined.
    pub fn recovery_step(&self, run: &Run, loss: Step) -> Option<Step> {
        let needed = self.params.min_consecutive.max(1);
        let mut streak = 0u64;
        for r in run.range_from(loss) {
            if self.within_tolerance(r) {
                streak += 1;
                if streak >= needed {
                    return Some(r.step.back(needed - 1));
                }
            } else {
                streak = 0;
            }
        }
        None
    }

    /// Both speed and spacing are close enough to nominal.
    pub fn within_tolerance(&self, r: &SummaryRecord) -> bool {
        let speed_ok = (r.mean_v - self.nominal.speed).abs() <= self.params.speed_tol;
        let gap_ok = (r.mean_gap - self.nominal.spacing).abs()
            <= self.params.gap_tol_frac * self.nominal.spacing;
        speed_ok && gap_ok
    }
}
