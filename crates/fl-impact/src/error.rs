use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImpactError {
    /// The run has no loss steps, so there is nothing to analyze.  Reported
    /// separately from an empty result so sweeps can tell the two apart.
    #[error("no loss steps found")]
    NoEvents,

    #[error("cannot infer nominal values from an empty run")]
    EmptyRun,
}

pub type ImpactResult<T> = Result<T, ImpactError>;
