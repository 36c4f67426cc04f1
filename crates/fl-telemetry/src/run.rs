//! `Run`: the summary time series of one simulation, sorted by step.

use fl_core::Step;

use crate::SummaryRecord;

#[cfg(feature = "fx-hash")]
type StepMap<V> = rustc_hash::FxHashMap<Step, V>;
#[cfg(not(feature = "fx-hash"))]
type StepMap<V> = std::collections::HashMap<Step, V>;

// ── Run ───────────────────────────────────────────────────────────────────────

/// Summary records of one run in strictly ascending step order.
///
/// Immutable once built.  Range queries use binary partition on the sorted
/// steps, so the records of any half-open step interval are a contiguous
/// sub-slice.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Run {
    records: Vec<SummaryRecord>,
}

impl Run {
    /// Sort `records` by step and drop duplicate steps.
    ///
    /// When a step occurs more than once the record that came last in the
    /// input wins, the same outcome as building a step-keyed map in file
    /// order.
    pub fn from_records(mut records: Vec<SummaryRecord>) -> Self {
        // Stable sort keeps input order within a step.
        records.sort_by_key(|r| r.step);
        let mut deduped: Vec<SummaryRecord> = Vec::with_capacity(records.len());
        for r in records {
            match deduped.last_mut() {
                Some(last) if last.step == r.step => *last = r,
                _ => deduped.push(r),
            }
        }
        Self { records: deduped }
    }

    pub fn records(&self) -> &[SummaryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The lowest-step record (the step-0 record of a well-formed run).
    pub fn first(&self) -> Option<&SummaryRecord> {
        self.records.first()
    }

    /// Highest step present.
    pub fn last_step(&self) -> Option<Step> {
        self.records.last().map(|r| r.step)
    }

    /// `last_step + 1`, or 0 for an empty run.
    pub fn total_steps(&self) -> u64 {
        self.last_step().map_or(0, |s| s.0 + 1)
    }

    /// Records with `start <= step < end`.
    pub fn range(&self, start: Step, end: Step) -> &[SummaryRecord] {
        if end <= start {
            return &[];
        }
        let lo = self.records.partition_point(|r| r.step < start);
        let hi = self.records.partition_point(|r| r.step < end);
        &self.records[lo..hi]
    }

    /// Records with `step >= start`.
    pub fn range_from(&self, start: Step) -> &[SummaryRecord] {
        let lo = self.records.partition_point(|r| r.step < start);
        &self.records[lo..]
    }

    /// Build an O(1) step → record lookup table.
    pub fn index_by_step(&self) -> StepIndex<'_> {
        let mut map = StepMap::default();
        map.reserve(self.records.len());
        for r in &self.records {
            map.insert(r.step, r);
        }
        StepIndex { map }
    }
}

// ── StepIndex ────────────────────────────────────────────────────────────────

/// Hash index over a [`Run`], used for point comparisons between two steps.
pub struct StepIndex<'a> {
    map: StepMap<&'a SummaryRecord>,
}

impl<'a> StepIndex<'a> {
    pub fn get(&self, step: Step) -> Option<&'a SummaryRecord> {
        self.map.get(&step).copied()
    }

    pub fn contains(&self, step: Step) -> bool {
        self.map.contains_key(&step)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
