//! `fl-core`: foundational types for the `fleetlab` loss-impact engine.
//!
//! This crate is a dependency of every other `fl-*` crate.  It has no `fl-*`
//! dependencies and only small external ones (`thiserror`, `serde`, `toml`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentIndex`                                          |
//! | [`time`]        | `Step`, `StepClock`                                   |
//! | [`config`]      | `AnalysisConfig`, `ImpactParams`, `Nominal`           |
//! | [`paths`]       | `InputPaths`                                          |
//! | [`error`]       | `ConfigError`, `ConfigResult`                         |

pub mod config;
pub mod error;
pub mod ids;
pub mod paths;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{AnalysisConfig, ImpactParams, Nominal};
pub use error::{ConfigError, ConfigResult};
pub use ids::AgentIndex;
pub use paths::InputPaths;
pub use time::{Step, StepClock};
