//! Configuration error type.
//!
//! Telemetry, analysis, and output crates define their own error enums; this
//! one only covers loading and validating [`AnalysisConfig`][crate::AnalysisConfig].

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path:   PathBuf,
        source: std::io::Error,
    },

    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Shorthand result type for configuration handling.
pub type ConfigResult<T> = Result<T, ConfigError>;
