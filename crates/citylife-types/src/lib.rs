//! Shared type definitions for the CityLife simulation.
//!
//! This crate is the single source of truth for the leaf types used across
//! the CityLife workspace: typed identifiers, the commute activity enum,
//! wall-clock time-of-day, and map positions.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for all entity identifiers
//! - [`activity`] -- The per-person commute activity (at home / moving / working)
//! - [`time`] -- Seconds-of-day wall time ([`DayTime`])
//! - [`position`] -- Map coordinates and the tracked-position sum type

pub mod activity;
pub mod ids;
pub mod position;
pub mod time;

// Re-export all public types at crate root for convenience.
pub use activity::Activity;
pub use ids::{BusinessId, LineId, PersonId, ZoneId};
pub use position::{Position, TrackedPosition};
pub use time::{DayTime, SECONDS_PER_DAY};
