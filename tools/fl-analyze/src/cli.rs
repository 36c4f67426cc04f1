//! Command-line surface.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use fl_core::{AnalysisConfig, InputPaths};

#[derive(Parser, Debug)]
#[command(name = "fl-analyze")]
#[command(about = "Loss impact and recovery analysis for fleet-formation simulator runs")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Per-loss baseline, peak rebound, slope, and recovery of one run
    Impact {
        /// Per-step summary (`;`-delimited)
        #[arg(long, value_name = "FILE")]
        summary: PathBuf,

        /// Loss schedule; a missing file means no losses
        #[arg(long, value_name = "FILE")]
        losses: PathBuf,

        /// Per-agent trace; adds the inferred spare steps to the preamble
        #[arg(long, value_name = "FILE")]
        trace: Option<PathBuf>,

        #[command(flatten)]
        analysis: AnalysisArgs,
    },

    /// Chronological loss/spare events and the delay from each loss to the next spare
    Timeline {
        #[arg(long, value_name = "FILE")]
        losses: PathBuf,

        #[arg(long, value_name = "FILE")]
        trace: PathBuf,

        #[command(flatten)]
        analysis: AnalysisArgs,
    },

    /// Pre-loss, post-loss, and end-of-run window means across many runs
    Windows {
        /// Report file; stdout when omitted
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,

        /// Shared loss schedule; its first step splits the pre and post windows
        #[arg(long, value_name = "FILE")]
        losses: Option<PathBuf>,

        /// Explicit first loss step; overrides --losses
        #[arg(long, value_name = "STEP")]
        first_loss: Option<u64>,

        /// Worker threads for loading runs (default: all cores)
        #[arg(long)]
        threads: Option<usize>,

        /// Summary files, one per run; each run is named after its directory
        #[arg(required = true, value_name = "SUMMARY")]
        summaries: Vec<PathBuf>,

        #[command(flatten)]
        analysis: AnalysisArgs,
    },
}

impl Command {
    /// Input files named on the command line.  `windows` reads its summaries
    /// through the sweep and only carries its schedule here.
    pub fn input_paths(&self) -> InputPaths {
        match self {
            Command::Impact { summary, losses, trace, .. } => {
                let paths = InputPaths::new(losses).with_summary(summary);
                match trace {
                    Some(t) => paths.with_trace(t),
                    None => paths,
                }
            }
            Command::Timeline { losses, trace, .. } => InputPaths::new(losses).with_trace(trace),
            Command::Windows { losses, .. } => {
                InputPaths::new(losses.clone().unwrap_or_default())
            }
        }
    }

    pub fn analysis(&self) -> &AnalysisArgs {
        match self {
            Command::Impact { analysis, .. }
            | Command::Timeline { analysis, .. }
            | Command::Windows { analysis, .. } => analysis,
        }
    }
}

/// Analysis parameters.  Flags override values from `--config`.
#[derive(Args, Debug, Default)]
pub struct AnalysisArgs {
    /// TOML analysis configuration
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Nominal speed V (default: mean_v of the first summary record)
    #[arg(long = "V", value_name = "SPEED")]
    pub nominal_speed: Option<f64>,

    /// Nominal spacing d* (default: mean_gap of the first summary record)
    #[arg(long = "d-star", value_name = "GAP")]
    pub nominal_spacing: Option<f64>,

    /// Steps before a loss averaged for the baseline [default: 25]
    #[arg(long)]
    pub pre: Option<u64>,

    /// Steps after a loss searched for the peak [default: 150]
    #[arg(long)]
    pub post: Option<u64>,

    /// Steps after a loss for the rebound slope [default: 25]
    #[arg(long)]
    pub slope_window: Option<u64>,

    /// Recovery tolerance around V [default: 0.05]
    #[arg(long)]
    pub speed_tol: Option<f64>,

    /// Recovery tolerance around d*, as a fraction of d* [default: 0.05]
    #[arg(long)]
    pub gap_tol_frac: Option<f64>,

    /// Consecutive in-tolerance steps that count as recovered [default: 10]
    #[arg(long)]
    pub min_consecutive: Option<u64>,

    /// Seconds per step; adds time columns
    #[arg(long, value_name = "SECS")]
    pub dt: Option<f64>,

    /// Start of the end-of-run window as a fraction of the run [default: 0.8]
    #[arg(long)]
    pub end_fraction: Option<f64>,
}

impl AnalysisArgs {
    /// Defaults, then the config file, then flags.  The result is validated.
    pub fn resolve(&self) -> Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::load(path)?,
            None => AnalysisConfig::default(),
        };

        if self.nominal_speed.is_some() {
            config.nominal_speed = self.nominal_speed;
        }
        if self.nominal_spacing.is_some() {
            config.nominal_spacing = self.nominal_spacing;
        }
        if self.dt.is_some() {
            config.step_secs = self.dt;
        }
        config.pre = self.pre.unwrap_or(config.pre);
        config.post = self.post.unwrap_or(config.post);
        config.slope_window = self.slope_window.unwrap_or(config.slope_window);
        config.speed_tol = self.speed_tol.unwrap_or(config.speed_tol);
        config.gap_tol_frac = self.gap_tol_frac.unwrap_or(config.gap_tol_frac);
        config.min_consecutive = self.min_consecutive.unwrap_or(config.min_consecutive);
        config.end_fraction = self.end_fraction.unwrap_or(config.end_fraction);

        config.validate()?;
        Ok(config)
    }
}
