//! Plain data rows produced by the readers.

use fl_core::{AgentIndex, Step};

/// Formation-wide aggregates for one simulation step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryRecord {
    pub step:     Step,
    /// Number of active agents.
    pub alive:    u32,
    pub mean_v:   f64,
    pub std_v:    f64,
    pub mean_gap: f64,
    pub std_gap:  f64,
}

/// One row of the per-agent trace.  Trailing columns are not retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceRow {
    pub step:  Step,
    pub agent: AgentIndex,
    /// 1 = active, 0 = lost/inactive.  Any other integer is kept as read
    /// and simply never matches a transition.
    pub alive: i32,
}

/// An entry of the authoritative loss schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LossEvent {
    pub step:  Step,
    pub agent: AgentIndex,
}
