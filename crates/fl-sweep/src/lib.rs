//! `fl-sweep`: window statistics over many independent runs.
//!
//! # Two-phase sweep
//!
//! ```text
//! ① Analyze  : for each RunSpec: read summary, aggregate windows
//!              (parallel with the `parallel` feature).  Each run yields a
//!              complete RunSummary or a RunFailure, never a partial row.
//! ② Commit   : in input order: observer.on_run_complete / on_run_failed,
//!              then observer.on_sweep_end.
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs the analyze phase on Rayon's thread pool.         |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use fl_sweep::{NoopObserver, RunSpec, SweepBuilder};
//!
//! let sweep = SweepBuilder::new(config)
//!     .loss_schedule(Path::new("losses_seeded.csv"))
//!     .runs(paths.iter().map(|p| RunSpec::from_summary_path(p)))
//!     .build()?;
//! let stats = sweep.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod run;
pub mod sweep;

#[cfg(test)]
mod tests;

pub use builder::SweepBuilder;
pub use error::{SweepError, SweepResult};
pub use observer::{NoopObserver, SweepObserver};
pub use run::{RunFailure, RunSpec, RunSummary};
pub use sweep::{Sweep, SweepStats};
