//! Analysis configuration.
//!
//! Every tunable of the engine lives in [`AnalysisConfig`].  It is built from
//! defaults, optionally overlaid by a TOML file, then by command-line flags,
//! and finally handed to each component by value.  Nothing here is global.
//!
//! ```toml
//! # analysis.toml, every key is optional
//! nominal_speed   = 1.0
//! nominal_spacing = 5.0
//! pre             = 25
//! post            = 150
//! slope_window    = 25
//! speed_tol       = 0.05
//! gap_tol_frac    = 0.05
//! min_consecutive = 10
//! step_secs       = 0.1
//! end_fraction    = 0.8
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::{ConfigError, ConfigResult, StepClock};

// ── AnalysisConfig ────────────────────────────────────────────────────────────

/// Top-level analysis configuration.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Nominal formation speed `V`.  `None` infers it from the first summary
    /// record of the run.
    pub nominal_speed: Option<f64>,

    /// Nominal inter-agent spacing `d*`.  `None` infers it from the first
    /// summary record of the run.
    pub nominal_spacing: Option<f64>,

    /// Baseline window length: steps `[L - pre, L)` before a loss.
    pub pre: u64,

    /// Peak search horizon: steps `[L, L + post]`.
    pub post: u64,

    /// Distance in steps between the two points of the rebound slope.
    pub slope_window: u64,

    /// Absolute recovery tolerance around `V`.
    pub speed_tol: f64,

    /// Recovery tolerance around `d*`, as a fraction of `d*`.
    pub gap_tol_frac: f64,

    /// Consecutive in-tolerance steps required before recovery is declared.
    pub min_consecutive: u64,

    /// Simulated seconds per step.  Only used to add time columns to reports.
    pub step_secs: Option<f64>,

    /// Start of the end-of-run window as a fraction of the run length.
    pub end_fraction: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            nominal_speed:   None,
            nominal_spacing: None,
            pre:             25,
            post:            150,
            slope_window:    25,
            speed_tol:       0.05,
            gap_tol_frac:    0.05,
            min_consecutive: 10,
            step_secs:       None,
            end_fraction:    0.8,
        }
    }
}

impl AnalysisConfig {
    /// Parse a TOML document.  Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: AnalysisConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Reject parameter combinations the engine cannot interpret.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.min_consecutive == 0 {
            return Err(invalid("min_consecutive must be at least 1"));
        }
        if self.slope_window == 0 {
            return Err(invalid("slope_window must be at least 1"));
        }
        non_negative("speed_tol", self.speed_tol)?;
        non_negative("gap_tol_frac", self.gap_tol_frac)?;
        if !(0.0..=1.0).contains(&self.end_fraction) {
            return Err(invalid(format!(
                "end_fraction must lie in [0, 1], got {}",
                self.end_fraction
            )));
        }
        if let Some(v) = self.nominal_speed {
            positive("nominal_speed", v)?;
        }
        if let Some(d) = self.nominal_spacing {
            positive("nominal_spacing", d)?;
        }
        if let Some(dt) = self.step_secs {
            positive("step_secs", dt)?;
        }
        Ok(())
    }

    /// The subset of parameters the impact analyzer needs.
    pub fn impact_params(&self) -> ImpactParams {
        ImpactParams {
            pre:             self.pre,
            post:            self.post,
            slope_window:    self.slope_window,
            speed_tol:       self.speed_tol,
            gap_tol_frac:    self.gap_tol_frac,
            min_consecutive: self.min_consecutive,
        }
    }

    /// Resolve `V` and `d*`, falling back to the run's first record for any
    /// value not given explicitly.
    pub fn resolve_nominal(&self, first_mean_v: f64, first_mean_gap: f64) -> Nominal {
        Nominal {
            speed:   self.nominal_speed.unwrap_or(first_mean_v),
            spacing: self.nominal_spacing.unwrap_or(first_mean_gap),
        }
    }

    /// A step-to-seconds converter, if `step_secs` is configured.
    pub fn clock(&self) -> Option<StepClock> {
        self.step_secs.map(StepClock::new)
    }
}

// ── ImpactParams ──────────────────────────────────────────────────────────────

/// Per-loss analysis parameters.  See the matching [`AnalysisConfig`] fields.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ImpactParams {
    pub pre:             u64,
    pub post:            u64,
    pub slope_window:    u64,
    pub speed_tol:       f64,
    pub gap_tol_frac:    f64,
    pub min_consecutive: u64,
}

impl Default for ImpactParams {
    fn default() -> Self {
        AnalysisConfig::default().impact_params()
    }
}

// ── Nominal ──────────────────────────────────────────────────────────────────

/// Reference speed and spacing the formation is expected to return to.
///
/// Fixed for the whole analysis of one run.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Nominal {
    /// `V`
    pub speed:   f64,
    /// `d*`
    pub spacing: f64,
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn invalid(msg: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(msg.into())
}

fn non_negative(name: &str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be a finite non-negative number, got {value}")))
    }
}

fn positive(name: &str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be a finite positive number, got {value}")))
    }
}
