//! Orchestration for the CityLife simulation.
//!
//! This crate owns simulated time and the tick cycle: the [`SimClock`]
//! advances time-of-day and the day counter, [`run_tick`] broadcasts
//! each tick to an ordered observer list (persons first, then
//! businesses), and [`run_simulation`] paces the loop against wall
//! clock time under operator control.
//!
//! # Modules
//!
//! - [`clock`] -- [`SimClock`] and the per-tick [`TimeUpdate`] payload.
//! - [`tick`] -- [`CityState`], the [`ClockObserver`] trait, the
//!   standard person/business passes, and [`TickSummary`].
//! - [`operator`] -- Lock-free pause/resume, pacing, and stop controls.
//! - [`runner`] -- The async tick loop and the [`TickCallback`] hook.
//! - [`config`] -- YAML configuration with typed zone/transport lists.
//! - [`snapshot`] -- Consistent end-of-tick views for presentation.

pub mod clock;
pub mod config;
pub mod operator;
pub mod runner;
pub mod snapshot;
pub mod tick;

// Re-export primary types at crate root.
pub use clock::{ClockError, SimClock, TimeUpdate};
pub use config::{ConfigError, SimulationConfig, TransportDef, ZoneDef};
pub use operator::{OperatorControls, SimulationEndReason};
pub use runner::{NoOpCallback, RunnerError, SimulationReport, TickCallback, run_simulation};
pub use snapshot::CitySnapshot;
pub use tick::{
    BusinessObserver, CityState, ClockObserver, ObserverRegistry, PersonObserver, TickError,
    TickSummary, run_tick,
};
