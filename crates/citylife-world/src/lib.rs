//! Zones, transport lines, and the routing table for the CityLife simulation.
//!
//! This crate models the physical city: named rectangular zones with a
//! business share and a welfare income range, transport lines with a
//! passenger capacity and live occupancy, and the [`TransportNetwork`]
//! that maps every zone pair to the line and travel duration connecting
//! them.
//!
//! # Modules
//!
//! - [`error`] -- Error types for world construction and lookups.
//! - [`zone`] -- [`Zone`] and [`Boundary`] geometry, welfare income range.
//! - [`transport`] -- [`TransportLine`] occupancy plus the stateless
//!   congestion strategy (`is_congested`, `calculate_arrival_time`).
//! - [`network`] -- The zone-pair routing table, built once at setup and
//!   read-only thereafter except for line occupancy counters.

pub mod error;
pub mod network;
pub mod transport;
pub mod zone;

// Re-export primary types at crate root.
pub use error::WorldError;
pub use network::{TransportNetwork, Trip};
pub use transport::{TransportLine, calculate_arrival_time, is_congested};
pub use zone::{Boundary, IncomeRange, Zone};
