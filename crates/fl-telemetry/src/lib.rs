//! `fl-telemetry`: readers for the simulator's output files.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`record`]   | `SummaryRecord`, `TraceRow`, `LossEvent`                   |
//! | [`run`]      | `Run` (sorted, deduplicated summary), `StepIndex`          |
//! | [`loader`]   | `read_summary`, `read_loss_schedule`, `read_trace`         |
//! | [`error`]    | `TelemetryError`, `TelemetryResult<T>`                     |
//!
//! # File formats
//!
//! ```text
//! summary.csv   step;alive;mean_v;std_v;mean_gap;std_gap     (required)
//! losses.csv    step,idx   or   step;idx                     (optional)
//! trace.csv     step;idx;alive;...                           (streamed)
//! ```
//!
//! The first line of every file is a header.  Data rows that fail to parse
//! are skipped and counted; only I/O failures and a summary without usable
//! rows are fatal.

pub mod error;
pub mod loader;
pub mod record;
pub mod run;


pub use error::{TelemetryError, TelemetryResult};
pub use loader::{
    TraceRows, read_loss_schedule, read_loss_schedule_reader, read_summary, read_summary_reader,
    read_trace, read_trace_reader,
};
pub use record::{LossEvent, SummaryRecord, TraceRow};
pub use run::{Run, StepIndex};
