//! Unit tests for fl-sweep.

use std::fs;
use std::path::{Path, PathBuf};

use fl_core::{AnalysisConfig, Step};

use crate::{
    NoopObserver, RunFailure, RunSpec, RunSummary, SweepBuilder, SweepError, SweepObserver,
    SweepStats,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

const SUMMARY_HEADER: &str = "step;alive;mean_v;std_v;mean_gap;std_gap\n";

/// Write `<dir>/<name>/summary.csv` with `steps` records at `mean_v = v`.
fn write_run(dir: &Path, name: &str, steps: u64, v: f64) -> PathBuf {
    let run_dir = dir.join(name);
    fs::create_dir_all(&run_dir).unwrap();
    let mut body = String::from(SUMMARY_HEADER);
    for s in 0..steps {
        body.push_str(&format!("{s};10;{v};0.1;5.0;0.2\n"));
    }
    let path = run_dir.join("summary.csv");
    fs::write(&path, body).unwrap();
    path
}

#[derive(Default)]
struct Recorder {
    started:   Option<usize>,
    completed: Vec<String>,
    failed:    Vec<String>,
    order:     Vec<String>,
    ended:     Option<SweepStats>,
}

impl SweepObserver for Recorder {
    fn on_sweep_start(&mut self, runs: usize) {
        self.started = Some(runs);
    }
    fn on_run_complete(&mut self, summary: &RunSummary) {
        self.completed.push(summary.name.clone());
        self.order.push(summary.name.clone());
    }
    fn on_run_failed(&mut self, failure: &RunFailure) {
        self.failed.push(failure.name.clone());
        self.order.push(failure.name.clone());
    }
    fn on_sweep_end(&mut self, stats: &SweepStats) {
        self.ended = Some(*stats);
    }
}

// ── RunSpec ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod run_spec {
    use super::*;

    #[test]
    fn named_after_parent_directory() {
        let spec = RunSpec::from_summary_path(Path::new("runs/seed_7/summary.csv"));
        assert_eq!(spec.name, "seed_7");
        assert_eq!(spec.summary, PathBuf::from("runs/seed_7/summary.csv"));
    }

    #[test]
    fn bare_file_uses_stem() {
        let spec = RunSpec::from_summary_path(Path::new("summary_a.csv"));
        assert_eq!(spec.name, "summary_a");
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use super::*;

    #[test]
    fn first_loss_from_schedule() {
        let dir = tempfile::tempdir().unwrap();
        let losses = dir.path().join("losses.csv");
        fs::write(&losses, "step,agent\n300,4\n120,2\n120,5\n").unwrap();

        let sweep = SweepBuilder::new(AnalysisConfig::default())
            .loss_schedule(&losses)
            .build()
            .unwrap();
        assert_eq!(sweep.first_loss(), Step(120));
    }

    #[test]
    fn missing_schedule_means_step_zero() {
        let dir = tempfile::tempdir().unwrap();
        let sweep = SweepBuilder::new(AnalysisConfig::default())
            .loss_schedule(&dir.path().join("absent.csv"))
            .build()
            .unwrap();
        assert_eq!(sweep.first_loss(), Step::ZERO);
    }

    #[test]
    fn explicit_first_loss_wins() {
        let dir = tempfile::tempdir().unwrap();
        let losses = dir.path().join("losses.csv");
        fs::write(&losses, "step,agent\n120,2\n").unwrap();

        let sweep = SweepBuilder::new(AnalysisConfig::default())
            .loss_schedule(&losses)
            .first_loss(Step(40))
            .build()
            .unwrap();
        assert_eq!(sweep.first_loss(), Step(40));
    }

    #[test]
    fn invalid_config_rejected() {
        let config = AnalysisConfig { end_fraction: 2.0, ..AnalysisConfig::default() };
        assert!(matches!(
            SweepBuilder::new(config).build(),
            Err(SweepError::Config(_))
        ));
    }
}

// ── Sweep ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod sweep {
    use super::*;

    #[test]
    fn commits_in_input_order_and_skips_failures() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_run(dir.path(), "seed_a", 50, 1.0);
        let b = write_run(dir.path(), "seed_b", 50, 2.0);
        let missing = dir.path().join("seed_x").join("summary.csv");

        let sweep = SweepBuilder::new(AnalysisConfig::default())
            .first_loss(Step(10))
            .runs([
                RunSpec::from_summary_path(&b),
                RunSpec::from_summary_path(&missing),
                RunSpec::from_summary_path(&a),
            ])
            .build()
            .unwrap();

        let mut rec = Recorder::default();
        let stats = sweep.run(&mut rec).unwrap();

        assert_eq!(stats, SweepStats { completed: 2, failed: 1 });
        assert_eq!(rec.started, Some(3));
        assert_eq!(rec.ended, Some(stats));
        assert_eq!(rec.order, vec!["seed_b", "seed_x", "seed_a"]);
        assert_eq!(rec.completed, vec!["seed_b", "seed_a"]);
        assert_eq!(rec.failed, vec!["seed_x"]);
    }

    #[test]
    fn run_summary_carries_windows() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_run(dir.path(), "seed_a", 100, 1.5);

        let sweep = SweepBuilder::new(AnalysisConfig::default())
            .first_loss(Step(20))
            .build()
            .unwrap();
        let summary = sweep.analyze_run(&RunSpec::from_summary_path(&a)).unwrap();

        assert_eq!(summary.records, 100);
        assert_eq!(summary.windows.first_loss, Step(20));
        assert_eq!(summary.windows.pre.count, 20);
        assert_eq!(summary.windows.post.count, 79);
        assert_eq!(summary.windows.end.count, 20);
        assert!((summary.windows.post.mean_v.unwrap() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn empty_sweep_still_ends() {
        let sweep = SweepBuilder::new(AnalysisConfig::default()).build().unwrap();
        let mut rec = Recorder::default();
        let stats = sweep.run(&mut rec).unwrap();
        assert_eq!(stats, SweepStats::default());
        assert_eq!(rec.started, Some(0));
        assert_eq!(rec.ended, Some(SweepStats::default()));
    }

    #[test]
    fn noop_observer_runs() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_run(dir.path(), "seed_a", 10, 1.0);
        let sweep = SweepBuilder::new(AnalysisConfig::default())
            .runs([RunSpec::new("only", a)])
            .threads(2)
            .build()
            .unwrap();
        let stats = sweep.run(&mut NoopObserver).unwrap();
        assert_eq!(stats.completed, 1);
    }

    #[test]
    fn thread_count_kept_and_results_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let specs: Vec<RunSpec> = (0..4)
            .map(|i| RunSpec::from_summary_path(&write_run(dir.path(), &format!("seed_{i}"), 30, 1.0)))
            .collect();

        let default = SweepBuilder::new(AnalysisConfig::default())
            .runs(specs.clone())
            .build()
            .unwrap();
        let single = SweepBuilder::new(AnalysisConfig::default())
            .runs(specs)
            .threads(1)
            .build()
            .unwrap();
        assert_eq!(default.threads(), None);
        assert_eq!(single.threads(), Some(1));

        let mut a = Recorder::default();
        let mut b = Recorder::default();
        assert_eq!(default.run(&mut a).unwrap(), single.run(&mut b).unwrap());
        assert_eq!(a.order, b.order);
        assert_eq!(b.order, vec!["seed_0", "seed_1", "seed_2", "seed_3"]);
    }
}
