//! `fl-output`: report writers for the fleetlab loss-impact engine.
//!
//! Every report is comma-separated text with a fixed column order.  Floats
//! are written with six decimals; an undefined value is an empty field.
//!
//! | Report   | Layout                                                       |
//! |----------|--------------------------------------------------------------|
//! | impact   | preamble, blank line, one row per loss step                  |
//! | timeline | preamble, event table, blank line, loss → next-spare table   |
//! | windows  | one row per successfully loaded run                          |
//!
//! All reports go through [`ReportWriter`].  [`SweepOutputObserver`] drives
//! one from `fl_sweep::Sweep::run`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use fl_output::{CsvReportWriter, SweepOutputObserver};
//!
//! let writer = CsvReportWriter::create(Path::new("metrics.csv"))?;
//! let mut obs = SweepOutputObserver::new(writer);
//! sweep.run(&mut obs)?;
//! if let Some(e) = obs.take_error() { eprintln!("output error: {e}"); }
//! ```

pub mod csv;
pub mod error;
pub mod format;
pub mod observer;
pub mod preamble;
pub mod writer;

#[cfg(test)]
mod tests;

pub use csv::CsvReportWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SweepOutputObserver;
pub use preamble::Preamble;
pub use writer::ReportWriter;
