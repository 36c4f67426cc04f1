//! `fl-impact`: how the formation responds to each loss.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                 |
//! |---------------|----------------------------------------------------------|
//! | [`analyzer`]  | `ImpactAnalyzer`, `ImpactRow`, `Peak`                    |
//! | [`window`]    | `WindowAggregator`, `WindowStats`, `RunWindows`          |
//! | [`error`]     | `ImpactError`, `ImpactResult<T>`                         |
//!
//! # Per-loss metrics (summary)
//!
//! For each loss step `L`:
//!
//! ```text
//! baseline  = mean over [L - pre, L)            (fallback: record at L)
//! peak      = first max of mean_v over [L, L + post]
//! slope     = (v(L + w) - v(L)) / w
//! recovery  = start of the first run of `min_consecutive` records from L
//!             with |v - V| <= speed_tol and |gap - d*| <= gap_tol_frac * d*
//! ```
//!
//! Every metric over an empty selection is `None`; nothing here estimates a
//! value the data does not contain.

pub mod analyzer;
pub mod error;
pub mod window;


pub use analyzer::{ImpactAnalyzer, ImpactRow, Peak};
pub use error::{ImpactError, ImpactResult};
pub use window::{RunWindows, WindowAggregator, WindowStats};
