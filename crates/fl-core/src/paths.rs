//! Input file locations.

use std::path::{Path, PathBuf};

use crate::{ConfigError, ConfigResult};

/// Files making up one run's analysis.
///
/// Handed to the readers explicitly; no component looks up a path on its
/// own.  Which files are required depends on the report: impact needs the
/// summary, the timeline needs the trace, and both read the loss schedule.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputPaths {
    pub summary: Option<PathBuf>,
    /// A schedule that does not exist means no losses.
    pub losses:  PathBuf,
    pub trace:   Option<PathBuf>,
}

impl InputPaths {
    pub fn new(losses: impl Into<PathBuf>) -> Self {
        Self { losses: losses.into(), ..Self::default() }
    }

    pub fn with_summary(mut self, path: impl Into<PathBuf>) -> Self {
        self.summary = Some(path.into());
        self
    }

    pub fn with_trace(mut self, path: impl Into<PathBuf>) -> Self {
        self.trace = Some(path.into());
        self
    }

    pub fn require_summary(&self) -> ConfigResult<&Path> {
        self.summary
            .as_deref()
            .ok_or_else(|| ConfigError::Invalid("a summary file is required".into()))
    }

    pub fn require_trace(&self) -> ConfigResult<&Path> {
        self.trace
            .as_deref()
            .ok_or_else(|| ConfigError::Invalid("a trace file is required".into()))
    }
}
