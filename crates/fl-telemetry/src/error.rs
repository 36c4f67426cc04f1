use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("cannot open {path}: {source}")]
    Io {
        path:   PathBuf,
        source: std::io::Error,
    },

    /// An I/O failure while records were being read.  Row-level parse
    /// failures never surface here; those rows are skipped.
    #[error("read error: {0}")]
    Read(#[from] csv::Error),

    #[error("summary header is missing required column {0:?}")]
    MissingColumn(&'static str),

    #[error("summary contains no usable rows")]
    EmptySummary,
}

pub type TelemetryResult<T> = Result<T, TelemetryError>;
