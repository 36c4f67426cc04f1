//! Unit tests for fl-output.

use std::path::PathBuf;

use fl_core::{AgentIndex, InputPaths, Nominal, Step, StepClock};
use fl_events::{SpareEvent, StepSet, Timeline};
use fl_impact::{ImpactRow, Peak, RunWindows, WindowStats};
use fl_sweep::RunSummary;
use fl_telemetry::LossEvent;

use crate::writer::ReportWriter;
use crate::{CsvReportWriter, Preamble};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn buffer() -> CsvReportWriter<Vec<u8>> {
    CsvReportWriter::new(Vec::new())
}

fn lines(w: CsvReportWriter<Vec<u8>>) -> Vec<String> {
    let text = String::from_utf8(w.into_inner()).unwrap();
    text.lines().map(str::to_owned).collect()
}

fn steps(s: &[u64]) -> StepSet {
    s.iter().map(|&x| Step(x)).collect()
}

fn full_row() -> ImpactRow {
    ImpactRow {
        loss_step:      Step(100),
        baseline_v:     Some(1.0),
        baseline_gap:   Some(5.0),
        peak:           Some(Peak { step: Step(120), v: 1.25 }),
        delta_v:        Some(0.25),
        slope:          Some(0.0356),
        recovery_step:  Some(Step(141)),
        recovery_delay: Some(41),
    }
}

fn empty_row(step: u64) -> ImpactRow {
    ImpactRow {
        loss_step:      Step(step),
        baseline_v:     None,
        baseline_gap:   None,
        peak:           None,
        delta_v:        None,
        slope:          None,
        recovery_step:  None,
        recovery_delay: None,
    }
}

fn stats(v: f64, n: usize) -> WindowStats {
    WindowStats {
        mean_v:   Some(v),
        std_v:    Some(0.5),
        mean_gap: Some(5.0),
        std_gap:  Some(0.25),
        count:    n,
    }
}

fn summary(name: &str) -> RunSummary {
    RunSummary {
        name:    name.to_string(),
        summary: PathBuf::from(format!("runs/{name}/summary.csv")),
        records: 10,
        windows: RunWindows {
            first_loss: Step(4),
            pre:        stats(1.0, 4),
            post:       stats(2.0, 5),
            end:        WindowStats::default(),
        },
    }
}

// ── Formatting ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod format {
    use crate::format::{fmt_float, fmt_opt, fmt_span, fmt_time};

    use super::*;

    #[test]
    fn floats_six_decimals_or_empty() {
        assert_eq!(fmt_float(Some(1.0)), "1.000000");
        assert_eq!(fmt_float(Some(-0.125)), "-0.125000");
        assert_eq!(fmt_float(None), "");
        assert_eq!(fmt_float(Some(f64::NAN)), "");
        assert_eq!(fmt_float(Some(f64::INFINITY)), "");
    }

    #[test]
    fn optional_fields() {
        assert_eq!(fmt_opt(Some(Step(7))), "7");
        assert_eq!(fmt_opt(Some(-3i64)), "-3");
        assert_eq!(fmt_opt::<u64>(None), "");
    }

    #[test]
    fn time_needs_a_clock() {
        let clock = Some(StepClock::new(0.5));
        assert_eq!(fmt_time(clock, Some(Step(4))), "2.000000");
        assert_eq!(fmt_time(None, Some(Step(4))), "");
        assert_eq!(fmt_time(clock, None), "");
        assert_eq!(fmt_span(clock, Some(-2)), "-1.000000");
    }
}

// ── Preamble ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod preamble {
    use super::*;

    #[test]
    fn impact_preamble_lists_inputs() {
        let paths = InputPaths::new("losses.csv")
            .with_summary("summary.csv")
            .with_trace("trace.csv");
        let p = Preamble::impact(&paths, Nominal { speed: 1.5, spacing: 5.0 }, Some(&steps(&[140, 260])));

        let keys: Vec<&str> = p.entries().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, ["summary_file", "loss_file", "trace_file", "V", "d_star", "spare_steps"]);
        assert_eq!(p.entries()[3].1, "1.5");
        assert_eq!(p.entries()[4].1, "5.0");
        assert_eq!(p.entries()[5].1, "140,260");
    }

    #[test]
    fn trace_without_spares_omits_spare_line() {
        let paths = InputPaths::new("l.csv").with_summary("s.csv").with_trace("t.csv");
        let p = Preamble::impact(&paths, Nominal { speed: 1.0, spacing: 5.0 }, Some(&StepSet::new()));
        let mut w = buffer();
        w.write_preamble(&p).unwrap();
        assert_eq!(
            lines(w),
            ["summary_file s.csv", "loss_file l.csv", "trace_file t.csv", "V 1.0", "d_star 5.0", ""]
        );
    }

    #[test]
    fn optional_entries_omitted() {
        let paths = InputPaths::new("losses.csv").with_summary("summary.csv");
        let p = Preamble::impact(&paths, Nominal { speed: 1.0, spacing: 5.0 }, None);
        let keys: Vec<&str> = p.entries().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, ["summary_file", "loss_file", "V", "d_star"]);

        let t = Preamble::timeline(&paths, None);
        assert_eq!(t.entries().len(), 1);
        let t = Preamble::timeline(&paths, Some(StepClock::new(0.1)));
        assert_eq!(t.entries().last().unwrap(), &("dt", "0.1".to_string()));
    }

    #[test]
    fn written_as_key_value_then_blank_line() {
        let mut p = Preamble::new();
        p.push("V", 1.0);
        p.push("d_star", 5.0);
        let mut w = buffer();
        w.write_preamble(&p).unwrap();
        w.write_preamble(&Preamble::new()).unwrap();
        assert_eq!(lines(w), ["V 1", "d_star 5", ""]);
    }
}

// ── Tables ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tables {
    use super::*;

    #[test]
    fn impact_table() {
        let mut w = buffer();
        w.write_impact(&[full_row(), empty_row(250)]).unwrap();
        w.finish().unwrap();
        assert_eq!(
            lines(w),
            [
                "step,baseline_mean_v,baseline_mean_gap,peak_step,peak_v,delta_v,slope_v_per_step,recovery_step,recovery_delay",
                "100,1.000000,5.000000,120,1.250000,0.250000,0.035600,141,41",
                "250,,,,,,,,",
            ]
        );
    }

    #[test]
    fn impact_preamble_then_table() {
        let mut p = Preamble::new();
        p.push("V", 1.0);
        let mut w = buffer();
        w.write_preamble(&p).unwrap();
        w.write_impact(&[empty_row(3)]).unwrap();
        let out = lines(w);
        assert_eq!(out[0], "V 1");
        assert_eq!(out[1], "");
        assert!(out[2].starts_with("step,baseline_mean_v"));
        assert_eq!(out[3], "3,,,,,,,,");
    }

    #[test]
    fn timeline_sections_with_clock() {
        let losses = [
            LossEvent { step: Step(100), agent: AgentIndex(3) },
            LossEvent { step: Step(250), agent: AgentIndex(1) },
            LossEvent { step: Step(100), agent: AgentIndex(7) },
        ];
        let spares = [SpareEvent { step: Step(140), agent: AgentIndex(3) }];
        let timeline = Timeline::from_events(&losses, &spares);
        let mut w = buffer();
        w.write_timeline(&timeline, Some(StepClock::new(0.5))).unwrap();
        assert_eq!(
            lines(w),
            [
                "step,time_s,kind,events,agents,delta_steps,delta_s",
                "100,50.000000,LOSS,2,idx=3 idx=7,,",
                "140,70.000000,SPARE,1,idx=3,40,20.000000",
                "250,125.000000,LOSS,1,idx=1,110,55.000000",
                "",
                "loss_step,loss_time_s,next_spare_step,next_spare_time_s,delay_steps,delay_s",
                "100,50.000000,140,70.000000,40,20.000000",
                "250,125.000000,,,,",
            ]
        );
    }

    #[test]
    fn timeline_without_clock_leaves_time_empty() {
        let losses: StepSet = [Step(10), Step(10)].into_iter().collect();
        let timeline = Timeline::build(&losses, &steps(&[12]));
        let mut w = buffer();
        w.write_timeline(&timeline, None).unwrap();
        let out = lines(w);
        assert_eq!(out[1], "10,,LOSS,2,,,");
        assert_eq!(out[2], "12,,SPARE,1,,2,");
        assert_eq!(out[5], "10,,12,,2,");
    }

    #[test]
    fn windows_table() {
        let mut w = buffer();
        w.write_windows(&[summary("seed_1")]).unwrap();
        let out = lines(w);
        assert_eq!(
            out[0],
            "run,summary_path,first_loss_step,\
             pre_mean_v,pre_std_v,pre_mean_gap,pre_std_gap,\
             post_mean_v,post_std_v,post_mean_gap,post_std_gap,\
             end_mean_v,end_std_v,end_mean_gap,end_std_gap,\
             pre_n,post_n,end_n"
        );
        assert_eq!(
            out[1],
            "seed_1,runs/seed_1/summary.csv,4,\
             1.000000,0.500000,5.000000,0.250000,\
             2.000000,0.500000,5.000000,0.250000,\
             ,,,,\
             4,5,0"
        );
    }

    #[test]
    fn csv_file_backend() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("impact.csv");
        let mut w = CsvReportWriter::create(&path).unwrap();
        w.write_impact(&[full_row()]).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
        drop(w);

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "100");
        assert_eq!(&rows[0][8], "41");
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod observer {
    use fl_sweep::{RunFailure, SweepObserver, SweepStats};
    use fl_telemetry::TelemetryError;

    use super::*;
    use crate::SweepOutputObserver;

    #[test]
    fn rows_written_at_sweep_end_in_commit_order() {
        let mut obs = SweepOutputObserver::new(buffer());
        obs.on_sweep_start(3);
        obs.on_run_complete(&summary("seed_b"));
        obs.on_run_failed(&RunFailure {
            name:    "seed_x".into(),
            summary: PathBuf::from("runs/seed_x/summary.csv"),
            error:   TelemetryError::EmptySummary,
        });
        obs.on_run_complete(&summary("seed_a"));
        obs.on_sweep_end(&SweepStats { completed: 2, failed: 1 });

        assert!(obs.take_error().is_none());
        assert_eq!(obs.failed_runs(), ["seed_x"]);
        let out = lines(obs.into_writer());
        assert_eq!(out.len(), 3);
        assert!(out[1].starts_with("seed_b,"));
        assert!(out[2].starts_with("seed_a,"));
    }

    #[test]
    fn empty_sweep_writes_header_only() {
        let mut obs = SweepOutputObserver::new(buffer());
        obs.on_sweep_start(0);
        obs.on_sweep_end(&SweepStats::default());
        let out = lines(obs.into_writer());
        assert_eq!(out.len(), 1);
        assert!(out[0].starts_with("run,summary_path"));
    }
}
