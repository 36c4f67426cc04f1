//! `key value` header lines describing a report's inputs.

use std::fmt::Display;

use fl_core::{InputPaths, Nominal, StepClock};
use fl_events::StepSet;

/// Ordered `key value` pairs written above a report table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preamble {
    entries: Vec<(&'static str, String)>,
}

impl Preamble {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: &'static str, value: impl Display) {
        self.entries.push((key, value.to_string()));
    }

    pub fn entries(&self) -> &[(&'static str, String)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inputs, resolved nominal values, and the inferred spare steps (only
    /// when a trace was read and held at least one).
    pub fn impact(paths: &InputPaths, nominal: Nominal, spares: Option<&StepSet>) -> Self {
        let mut p = Self::new();
        if let Some(summary) = &paths.summary {
            p.push("summary_file", summary.display());
        }
        p.push("loss_file", paths.losses.display());
        if let Some(trace) = &paths.trace {
            p.push("trace_file", trace.display());
        }
        p.push("V", fmt_real(nominal.speed));
        p.push("d_star", fmt_real(nominal.spacing));
        if let Some(spares) = spares.filter(|s| !s.is_empty()) {
            let steps: Vec<String> = spares.iter().map(|s| s.to_string()).collect();
            p.push("spare_steps", steps.join(","));
        }
        p
    }

    pub fn timeline(paths: &InputPaths, clock: Option<StepClock>) -> Self {
        let mut p = Self::new();
        p.push("loss_file", paths.losses.display());
        if let Some(trace) = &paths.trace {
            p.push("trace_file", trace.display());
        }
        if let Some(clock) = clock {
            p.push("dt", fmt_real(clock.step_secs));
        }
        p
    }
}

/// Shortest round-trip form that always shows a decimal point (`1.0`, `0.1`).
fn fmt_real(v: f64) -> String {
    format!("{v:?}")
}
