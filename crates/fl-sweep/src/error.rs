use fl_core::ConfigError;
use fl_telemetry::TelemetryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SweepError {
    #[error("sweep configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("cannot load loss schedule: {0}")]
    LossSchedule(#[from] TelemetryError),

    #[error("cannot build worker pool: {0}")]
    ThreadPool(String),
}

pub type SweepResult<T> = Result<T, SweepError>;
