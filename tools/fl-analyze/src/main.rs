//! fl-analyze: loss-impact and recovery reports for fleet-formation runs.
//!
//! ```text
//! fl-analyze impact   --summary summary.csv --losses losses_seeded.csv [--trace trace.csv]
//! fl-analyze timeline --losses losses_seeded.csv --trace trace.csv [--dt 0.1]
//! fl-analyze windows  --out metrics.csv --losses losses_seeded.csv runs/*/summary.csv
//! ```
//!
//! Reports go to stdout (or `--out`); logs go to stderr and honour `RUST_LOG`.

mod cli;

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use fl_core::{AnalysisConfig, InputPaths, Step};
use fl_events::{
    SpareEvent, StepSet, Timeline, extract_loss_steps, extract_spare_events, extract_spare_steps,
};
use fl_impact::{ImpactAnalyzer, ImpactError};
use fl_output::{CsvReportWriter, Preamble, ReportWriter, SweepOutputObserver};
use fl_sweep::{RunSpec, SweepBuilder, SweepStats};
use fl_telemetry::{LossEvent, read_loss_schedule, read_summary, read_trace};

use cli::{Cli, Command};

/// Exit status when the loss schedule holds no loss steps.
const EXIT_NO_EVENTS: u8 = 3;

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.command.analysis().resolve()?;

    match &cli.command {
        Command::Impact { .. } => impact(&config, &cli.command.input_paths()),
        Command::Timeline { .. } => timeline(&config, &cli.command.input_paths()),
        Command::Windows { out, losses, first_loss, threads, summaries, .. } => {
            let mut builder = SweepBuilder::new(config)
                .runs(summaries.iter().map(|p| RunSpec::from_summary_path(p)));
            if let Some(path) = losses {
                builder = builder.loss_schedule(path);
            }
            if let Some(step) = first_loss {
                builder = builder.first_loss(Step(*step));
            }
            if let Some(n) = threads {
                builder = builder.threads(*n);
            }

            let stats = match out {
                Some(path) => {
                    let writer = CsvReportWriter::create(path)
                        .with_context(|| format!("creating {}", path.display()))?;
                    let stats = sweep(builder, writer)?;
                    info!(path = %path.display(), rows = stats.completed, "wrote window report");
                    stats
                }
                None => sweep(builder, CsvReportWriter::stdout())?,
            };
            Ok(if stats.completed == 0 && stats.failed > 0 {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
    }
}

// ── Subcommands ───────────────────────────────────────────────────────────────

fn impact(config: &AnalysisConfig, paths: &InputPaths) -> Result<ExitCode> {
    let summary = paths.require_summary()?;
    let run = read_summary(summary)
        .with_context(|| format!("reading summary {}", summary.display()))?;
    let losses = read_losses(&paths.losses)?;
    let spares = match &paths.trace {
        Some(trace) => Some(read_spares(trace)?),
        None => None,
    };

    let analyzer = ImpactAnalyzer::for_run(config, &run)?;
    let mut out = CsvReportWriter::stdout();
    out.write_preamble(&Preamble::impact(paths, analyzer.nominal(), spares.as_ref()))?;

    match analyzer.analyze(&run, &losses) {
        Ok(rows) => {
            out.write_impact(&rows)?;
            out.finish()?;
            info!(losses = rows.len(), records = run.len(), "impact analysis complete");
            Ok(ExitCode::SUCCESS)
        }
        Err(ImpactError::NoEvents) => {
            out.finish()?;
            eprintln!("no loss events in {}", paths.losses.display());
            Ok(ExitCode::from(EXIT_NO_EVENTS))
        }
        Err(e) => Err(e.into()),
    }
}

fn timeline(config: &AnalysisConfig, paths: &InputPaths) -> Result<ExitCode> {
    let losses = read_loss_events(&paths.losses)?;
    let spares = read_spare_events(paths.require_trace()?)?;
    let timeline = Timeline::from_events(&losses, &spares);

    let clock = config.clock();
    let mut out = CsvReportWriter::stdout();
    out.write_preamble(&Preamble::timeline(paths, clock))?;
    out.write_timeline(&timeline, clock)?;
    out.finish()?;

    if losses.is_empty() {
        warn!(path = %paths.losses.display(), "loss schedule holds no losses");
    }
    info!(
        losses = losses.len(),
        spares = spares.len(),
        unanswered = timeline.follow_ups.iter().filter(|f| f.next_spare.is_none()).count(),
        "timeline complete"
    );
    Ok(ExitCode::SUCCESS)
}

fn sweep<W: ReportWriter>(builder: SweepBuilder, writer: W) -> Result<SweepStats> {
    let sweep = builder.build()?;
    let mut observer = SweepOutputObserver::new(writer);
    let stats = sweep.run(&mut observer)?;
    if let Some(e) = observer.take_error() {
        return Err(e).context("writing window report");
    }
    if !observer.failed_runs().is_empty() {
        warn!(runs = ?observer.failed_runs(), "runs without a row");
    }
    Ok(stats)
}

// ── Inputs ────────────────────────────────────────────────────────────────────

fn read_loss_events(path: &Path) -> Result<Vec<LossEvent>> {
    read_loss_schedule(path).with_context(|| format!("reading loss schedule {}", path.display()))
}

fn read_losses(path: &Path) -> Result<StepSet> {
    let losses = extract_loss_steps(&read_loss_events(path)?);
    if losses.total_events() > losses.len() {
        info!(
            events = losses.total_events(),
            steps = losses.len(),
            "several losses share a step; each step is analyzed once"
        );
    }
    Ok(losses)
}

fn read_spares(path: &Path) -> Result<StepSet> {
    let mut rows = read_trace(path).with_context(|| format!("opening trace {}", path.display()))?;
    let spares = extract_spare_steps(rows.by_ref());
    if let Some(e) = rows.take_error() {
        return Err(e).with_context(|| format!("reading trace {}", path.display()));
    }
    Ok(spares)
}

fn read_spare_events(path: &Path) -> Result<Vec<SpareEvent>> {
    let mut rows = read_trace(path).with_context(|| format!("opening trace {}", path.display()))?;
    let spares = extract_spare_events(rows.by_ref());
    if let Some(e) = rows.take_error() {
        return Err(e).with_context(|| format!("reading trace {}", path.display()));
    }
    Ok(spares)
}
