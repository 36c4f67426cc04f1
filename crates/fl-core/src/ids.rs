//! Agent identifier used by loss schedules and per-agent traces.

use std::fmt;

/// Slot index of an agent in the simulated formation.
///
/// The simulator reuses slots: a spare inserted after a loss takes over the
/// lost agent's index, which is why spare detection works per index rather
/// than per physical vehicle.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
pub struct AgentIndex(pub u32);

impl fmt::Display for AgentIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "idx={}", self.0)
    }
}
