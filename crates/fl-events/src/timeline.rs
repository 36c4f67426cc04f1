//! Loss/spare timeline reconciliation.
//!
//! Both inputs are already sorted [`StepSet`]s, so merging and the
//! loss → next-spare lookup are each a single forward pass:
//!
//! ```text
//! losses  100 ─────────── 250
//! spares        140 ───────── 260
//! merged  L100  S140  L250  S260
//! next    100 → 140 (+40)   250 → 260 (+10)
//! ```

use std::collections::BTreeMap;
use std::fmt;

use fl_core::{AgentIndex, Step};
use fl_telemetry::LossEvent;

use crate::{SpareEvent, StepSet, extract_loss_steps};

// ── Types ─────────────────────────────────────────────────────────────────────

/// Event source.  The derived order puts `Loss` before `Spare`, which is the
/// tie-break on a shared step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventKind {
    Loss,
    Spare,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Loss  => write!(f, "LOSS"),
            EventKind::Spare => write!(f, "SPARE"),
        }
    }
}

/// One point of the merged chronological timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEvent {
    pub step:   Step,
    pub kind:   EventKind,
    /// Events of this kind that collapsed onto `step`.
    pub count:  u32,
    /// Agents behind those events, in input order.  Empty when the timeline
    /// was built from bare steps.
    pub agents: Vec<AgentIndex>,
    /// Steps since the previous timeline point; `None` for the first.
    pub delta:  Option<u64>,
}

/// The first spare insertion strictly after a loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LossFollowUp {
    pub loss:       Step,
    pub next_spare: Option<Step>,
}

impl LossFollowUp {
    /// Steps from the loss to its next spare.
    pub fn delay(&self) -> Option<u64> {
        self.next_spare.map(|s| s - self.loss)
    }
}

// ── Timeline ──────────────────────────────────────────────────────────────────

/// Merged loss/spare timeline of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    pub events:     Vec<TimelineEvent>,
    pub follow_ups: Vec<LossFollowUp>,
}

impl Timeline {
    pub fn build(losses: &StepSet, spares: &StepSet) -> Self {
        Self {
            events:     Self::merge(losses, spares),
            follow_ups: Self::follow_ups(losses, spares),
        }
    }

    /// Like [`build`][Self::build], but every point also lists the agents
    /// that were lost or received a spare at that step.
    pub fn from_events(losses: &[LossEvent], spares: &[SpareEvent]) -> Self {
        let spare_steps: StepSet = spares.iter().map(|e| e.step).collect();
        let mut timeline = Self::build(&extract_loss_steps(losses), &spare_steps);

        let mut loss_agents = agents_by_step(losses.iter().map(|e| (e.step, e.agent)));
        let mut spare_agents = agents_by_step(spares.iter().map(|e| (e.step, e.agent)));
        for event in &mut timeline.events {
            let agents = match event.kind {
                EventKind::Loss  => &mut loss_agents,
                EventKind::Spare => &mut spare_agents,
            };
            event.agents = agents.remove(&event.step).unwrap_or_default();
        }
        timeline
    }

    /// Interleave both sets chronologically, losses first on shared steps.
    pub fn merge(losses: &StepSet, spares: &StepSet) -> Vec<TimelineEvent> {
        let mut l = losses.iter_counts().peekable();
        let mut s = spares.iter_counts().peekable();
        let mut out = Vec::with_capacity(losses.len() + spares.len());
        let mut prev: Option<Step> = None;

        loop {
            let take_loss = match (l.peek(), s.peek()) {
                (None, None)                     => break,
                (Some(_), None)                  => true,
                (None, Some(_))                  => false,
                (Some(&(ls, _)), Some(&(ss, _))) => ls <= ss,
            };
            let (kind, next) = if take_loss {
                (EventKind::Loss, l.next())
            } else {
                (EventKind::Spare, s.next())
            };
            let Some((step, count)) = next else { break };

            out.push(TimelineEvent {
                step,
                kind,
                count,
                agents: Vec::new(),
                delta: prev.map(|p| step - p),
            });
            prev = Some(step);
        }
        out
    }

    /// For each loss, the earliest spare step strictly greater than it.
    ///
    /// Losses are visited in ascending order and the spare cursor only moves
    /// forward, so the whole pass is O(losses + spares).
    pub fn follow_ups(losses: &StepSet, spares: &StepSet) -> Vec<LossFollowUp> {
        let mut cursor = spares.iter().peekable();
        losses
            .iter()
            .map(|loss| {
                while cursor.next_if(|&s| s <= loss).is_some() {}
                LossFollowUp { loss, next_spare: cursor.peek().copied() }
            })
            .collect()
    }
}

fn agents_by_step(events: impl Iterator<Item = (Step, AgentIndex)>) -> BTreeMap<Step, Vec<AgentIndex>> {
    let mut map: BTreeMap<Step, Vec<AgentIndex>> = BTreeMap::new();
    for (step, agent) in events {
        map.entry(step).or_default().push(agent);
    }
    map
}
