//! Event extraction from the loss schedule and the per-agent trace.

use fl_core::{AgentIndex, Step};
use fl_telemetry::{LossEvent, TraceRow};
use tracing::debug;

use crate::StepSet;

#[cfg(feature = "fx-hash")]
type AgentMap<V> = rustc_hash::FxHashMap<AgentIndex, V>;
#[cfg(not(feature = "fx-hash"))]
type AgentMap<V> = std::collections::HashMap<AgentIndex, V>;

/// A spare insertion inferred from a 0 → 1 alive-flag transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SpareEvent {
    pub step:  Step,
    pub agent: AgentIndex,
}

/// Distinct loss steps, ascending, regardless of how many agents were lost
/// at each.
pub fn extract_loss_steps(events: &[LossEvent]) -> StepSet {
    events.iter().map(|e| e.step).collect()
}

/// Distinct spare-insertion steps, ascending, merged across agents.
pub fn extract_spare_steps<I>(rows: I) -> StepSet
where
    I: IntoIterator<Item = TraceRow>,
{
    let mut steps = StepSet::new();
    scan_spares(rows, |e| steps.insert(e.step));
    steps
}

/// Every spare insertion with its agent index, in trace order.
pub fn extract_spare_events<I>(rows: I) -> Vec<SpareEvent>
where
    I: IntoIterator<Item = TraceRow>,
{
    let mut events = Vec::new();
    scan_spares(rows, |e| events.push(e));
    events
}

/// Drive the per-agent alive-flag state machine over `rows`.
///
/// The tracker starts empty (every agent "unknown") and is dropped on return,
/// so nothing carries over between calls.  An agent's first observation
/// never counts as a transition.
fn scan_spares<I, F>(rows: I, mut on_spare: F)
where
    I: IntoIterator<Item = TraceRow>,
    F: FnMut(SpareEvent),
{
    let mut last_alive: AgentMap<i32> = AgentMap::default();
    let mut observed = 0usize;
    let mut found = 0usize;

    for row in rows {
        observed += 1;
        let prev = last_alive.insert(row.agent, row.alive);
        if prev == Some(0) && row.alive == 1 {
            found += 1;
            on_spare(SpareEvent { step: row.step, agent: row.agent });
        }
    }

    debug!(observed, agents = last_alive.len(), spares = found, "scanned trace for spares");
}
