//! CSV report backend.
//!
//! Writes every table to a single sink.  Preamble lines and section breaks
//! are plain text; each table goes through its own `csv::Writer` borrowed
//! over the sink so quoting follows the CSV rules.

use std::fs::File;
use std::io::{self, BufWriter, Stdout, Write};
use std::path::Path;

use csv::WriterBuilder;
use fl_core::StepClock;
use fl_events::Timeline;
use fl_impact::{ImpactRow, WindowStats};
use fl_sweep::RunSummary;

use crate::format::{fmt_agents, fmt_float, fmt_opt, fmt_span, fmt_time};
use crate::writer::ReportWriter;
use crate::{OutputResult, Preamble};

const IMPACT_HEADER: [&str; 9] = [
    "step",
    "baseline_mean_v",
    "baseline_mean_gap",
    "peak_step",
    "peak_v",
    "delta_v",
    "slope_v_per_step",
    "recovery_step",
    "recovery_delay",
];

const EVENT_HEADER: [&str; 7] =
    ["step", "time_s", "kind", "events", "agents", "delta_steps", "delta_s"];

const FOLLOW_UP_HEADER: [&str; 6] = [
    "loss_step",
    "loss_time_s",
    "next_spare_step",
    "next_spare_time_s",
    "delay_steps",
    "delay_s",
];

const WINDOW_PREFIXES: [&str; 3] = ["pre", "post", "end"];
const WINDOW_METRICS:  [&str; 4] = ["mean_v", "std_v", "mean_gap", "std_gap"];

/// Writes reports as comma-separated text to any `Write` sink.
pub struct CsvReportWriter<W: Write> {
    out:      W,
    finished: bool,
}

impl<W: Write> CsvReportWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, finished: false }
    }

    /// Unwrap the sink (e.g. to inspect an in-memory buffer).
    pub fn into_inner(self) -> W {
        self.out
    }

    fn table(&mut self) -> csv::Writer<&mut W> {
        WriterBuilder::new().flexible(true).from_writer(&mut self.out)
    }
}

impl CsvReportWriter<BufWriter<File>> {
    /// Create (or truncate) the report file at `path`.
    pub fn create(path: &Path) -> OutputResult<Self> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl CsvReportWriter<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ReportWriter for CsvReportWriter<W> {
    fn write_preamble(&mut self, preamble: &Preamble) -> OutputResult<()> {
        if preamble.is_empty() {
            return Ok(());
        }
        for (key, value) in preamble.entries() {
            writeln!(self.out, "{key} {value}")?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    fn write_impact(&mut self, rows: &[ImpactRow]) -> OutputResult<()> {
        let mut w = self.table();
        w.write_record(IMPACT_HEADER)?;
        for row in rows {
            w.write_record(&[
                row.loss_step.to_string(),
                fmt_float(row.baseline_v),
                fmt_float(row.baseline_gap),
                fmt_opt(row.peak.map(|p| p.step)),
                fmt_float(row.peak.map(|p| p.v)),
                fmt_float(row.delta_v),
                fmt_float(row.slope),
                fmt_opt(row.recovery_step),
                fmt_opt(row.recovery_delay),
            ])?;
        }
        w.flush()?;
        Ok(())
    }

    fn write_timeline(&mut self, timeline: &Timeline, clock: Option<StepClock>) -> OutputResult<()> {
        {
            let mut w = self.table();
            w.write_record(EVENT_HEADER)?;
            for e in &timeline.events {
                let delta = e.delta.map(|d| d as i64);
                w.write_record(&[
                    e.step.to_string(),
                    fmt_time(clock, Some(e.step)),
                    e.kind.to_string(),
                    e.count.to_string(),
                    fmt_agents(&e.agents),
                    fmt_opt(e.delta),
                    fmt_span(clock, delta),
                ])?;
            }
            w.flush()?;
        }
        writeln!(self.out)?;

        let mut w = self.table();
        w.write_record(FOLLOW_UP_HEADER)?;
        for f in &timeline.follow_ups {
            let delay = f.delay().map(|d| d as i64);
            w.write_record(&[
                f.loss.to_string(),
                fmt_time(clock, Some(f.loss)),
                fmt_opt(f.next_spare),
                fmt_time(clock, f.next_spare),
                fmt_opt(f.delay()),
                fmt_span(clock, delay),
            ])?;
        }
        w.flush()?;
        Ok(())
    }

    fn write_windows(&mut self, runs: &[RunSummary]) -> OutputResult<()> {
        let mut header = vec![
            "run".to_string(),
            "summary_path".to_string(),
            "first_loss_step".to_string(),
        ];
        for prefix in WINDOW_PREFIXES {
            header.extend(WINDOW_METRICS.iter().map(|m| format!("{prefix}_{m}")));
        }
        header.extend(WINDOW_PREFIXES.iter().map(|p| format!("{p}_n")));

        let mut w = self.table();
        w.write_record(&header)?;
        for run in runs {
            let win = &run.windows;
            let mut record = vec![
                run.name.clone(),
                run.summary.display().to_string(),
                win.first_loss.to_string(),
            ];
            for stats in [&win.pre, &win.post, &win.end] {
                record.extend(window_fields(stats));
            }
            record.extend([win.pre.count, win.post.count, win.end.count].map(|n| n.to_string()));
            w.write_record(&record)?;
        }
        w.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.out.flush()?;
        Ok(())
    }
}

fn window_fields(stats: &WindowStats) -> [String; 4] {
    [
        fmt_float(stats.mean_v),
        fmt_float(stats.std_v),
        fmt_float(stats.mean_gap),
        fmt_float(stats.std_gap),
    ]
}
