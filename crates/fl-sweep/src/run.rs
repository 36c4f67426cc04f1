//! Per-run inputs and outcomes.

use std::path::{Path, PathBuf};

use fl_impact::RunWindows;
use fl_telemetry::TelemetryError;

/// One run to include in a sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSpec {
    /// Label written to the report's `run` column.
    pub name:    String,
    pub summary: PathBuf,
}

impl RunSpec {
    pub fn new(name: impl Into<String>, summary: impl Into<PathBuf>) -> Self {
        Self { name: name.into(), summary: summary.into() }
    }

    /// Name the run after the directory holding its summary file
    /// (`runs/seed_7/summary.csv` → `seed_7`), or the file stem when the
    /// path has no parent directory.
    pub fn from_summary_path(path: &Path) -> Self {
        let name = path
            .parent()
            .and_then(Path::file_name)
            .or_else(|| path.file_stem())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::new(name, path)
    }
}

/// A run that loaded completely.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub name:    String,
    pub summary: PathBuf,
    /// Summary records kept after parsing.
    pub records: usize,
    pub windows: RunWindows,
}

/// A run whose summary could not be loaded.  It contributes no row.
#[derive(Debug)]
pub struct RunFailure {
    pub name:    String,
    pub summary: PathBuf,
    pub error:   TelemetryError,
}
