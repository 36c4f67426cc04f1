//! Simulation step model.
//!
//! # Design
//!
//! The simulator writes one summary row per integer step.  Every window,
//! horizon, and delay in the engine is expressed in steps, so all of that
//! arithmetic is exact.  The mapping to seconds is optional and only used for
//! display:
//!
//!   seconds = step * step_secs
//!
//! `StepClock` holds `step_secs` (the simulator's `dt`).

use std::fmt;

// ── Step ─────────────────────────────────────────────────────────────────────

/// An absolute simulation step index.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct Step(pub u64);

impl Step {
    pub const ZERO: Step = Step(0);

    /// Return the step `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Step {
        Step(self.0.saturating_add(n))
    }

    /// Return the step `n` steps before `self`, clamped at step 0.
    #[inline]
    pub fn back(self, n: u64) -> Step {
        Step(self.0.saturating_sub(n))
    }

    /// Steps elapsed from `earlier` to `self`.
    ///
    /// # Panics
    /// Panics in debug mode if `earlier > self`.
    #[inline]
    pub fn since(self, earlier: Step) -> u64 {
        self.0 - earlier.0
    }

    /// Signed distance from `origin` to `self`.
    #[inline]
    pub fn signed_since(self, origin: Step) -> i64 {
        self.0 as i64 - origin.0 as i64
    }
}

impl std::ops::Add<u64> for Step {
    type Output = Step;
    #[inline]
    fn add(self, rhs: u64) -> Step {
        self.offset(rhs)
    }
}

impl std::ops::Sub for Step {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Step) -> u64 {
        self.since(rhs)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── StepClock ────────────────────────────────────────────────────────────────

/// Converts step counts to simulated seconds.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StepClock {
    /// Simulated seconds per step (the simulator's `dt`).
    pub step_secs: f64,
}

impl StepClock {
    pub fn new(step_secs: f64) -> Self {
        Self { step_secs }
    }

    /// Simulated time of `step` since step 0.
    #[inline]
    pub fn secs_at(&self, step: Step) -> f64 {
        step.0 as f64 * self.step_secs
    }

    /// Duration of a span of `steps` steps.
    #[inline]
    pub fn span_secs(&self, steps: i64) -> f64 {
        steps as f64 * self.step_secs
    }
}
