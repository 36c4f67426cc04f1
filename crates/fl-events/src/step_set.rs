//! `StepSet`: ascending set of event steps with per-step multiplicity.
//!
//! `BTreeMap` keeps the steps sorted at all times, so consumers can walk them
//! in chronological order without a separate sort, and duplicate inserts
//! collapse onto one key.

use std::collections::BTreeMap;

use fl_core::Step;

/// Distinct steps at which at least one event happened.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StepSet {
    inner: BTreeMap<Step, u32>,
    /// Cached total event count for O(1) `total_events()`.
    total: usize,
}

impl StepSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one event at `step`.
    pub fn insert(&mut self, step: Step) {
        *self.inner.entry(step).or_default() += 1;
        self.total += 1;
    }

    /// Number of distinct steps.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Total number of events, counting simultaneous events separately.
    pub fn total_events(&self) -> usize {
        self.total
    }

    pub fn contains(&self, step: Step) -> bool {
        self.inner.contains_key(&step)
    }

    /// How many events collapsed onto `step` (0 if none).
    pub fn events_at(&self, step: Step) -> u32 {
        self.inner.get(&step).copied().unwrap_or(0)
    }

    /// Earliest step, or `None` if empty.
    pub fn first(&self) -> Option<Step> {
        self.inner.keys().next().copied()
    }

    /// Steps in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = Step> + '_ {
        self.inner.keys().copied()
    }

    /// `(step, multiplicity)` pairs in ascending step order.
    pub fn iter_counts(&self) -> impl Iterator<Item = (Step, u32)> + '_ {
        self.inner.iter().map(|(&s, &n)| (s, n))
    }

    pub fn to_vec(&self) -> Vec<Step> {
        self.iter().collect()
    }
}

impl FromIterator<Step> for StepSet {
    fn from_iter<I: IntoIterator<Item = Step>>(iter: I) -> Self {
        let mut set = StepSet::new();
        for step in iter {
            set.insert(step);
        }
        set
    }
}
