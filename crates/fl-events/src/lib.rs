//! `fl-events`: event extraction and loss/spare timeline reconciliation.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`step_set`]  | `StepSet` (`BTreeMap<Step, u32>` of event steps)           |
//! | [`extract`]   | `extract_loss_steps`, `extract_spare_steps`, `SpareEvent`  |
//! | [`timeline`]  | `Timeline`, `TimelineEvent`, `LossFollowUp`                |
//!
//! # Event model
//!
//! Losses come from the authoritative schedule.  Spares are inferred: an
//! agent index whose alive flag goes from exactly 0 to exactly 1 between two
//! observations has received a spare.
//!
//! ```text
//! idx 3:  1 1 1 0 0 0 1 1 0 1
//!                     ^     ^   spare steps
//! ```
//!
//! Several events on one step collapse to a single timeline point.  The
//! number of events per step is retained in the `StepSet` for display, but
//! every downstream computation sees at most one event per step.

pub mod extract;
pub mod step_set;
pub mod timeline;


pub use extract::{SpareEvent, extract_loss_steps, extract_spare_events, extract_spare_steps};
pub use step_set::StepSet;
pub use timeline::{EventKind, LossFollowUp, Timeline, TimelineEvent};
