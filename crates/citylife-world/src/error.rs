//! Error types for the `citylife-world` crate.
//!
//! All of these are setup-time integrity failures: they indicate
//! malformed zone or transport definitions and abort simulation
//! construction rather than being retried.

use citylife_types::{LineId, ZoneId};

/// Errors that can occur while building or querying the city world.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// No transport line connects the given pair of distinct zones.
    #[error("no transport line between zones {from} and {to}")]
    RouteNotFound {
        /// Origin zone.
        from: ZoneId,
        /// Destination zone.
        to: ZoneId,
    },

    /// A random zone was requested from an empty zone set.
    #[error("no zones available")]
    NoZonesAvailable,

    /// A zone with the same name already exists (zone names are identity).
    #[error("duplicate zone name: {0}")]
    DuplicateZone(String),

    /// A transport line with this ID was already registered.
    #[error("duplicate transport line: {0}")]
    DuplicateLine(LineId),

    /// The zone pair is already connected by a line.
    #[error("zones {a} and {b} are already connected")]
    DuplicatePair {
        /// One endpoint.
        a: ZoneId,
        /// The other endpoint.
        b: ZoneId,
    },

    /// A referenced zone does not exist in the network.
    #[error("unknown zone: {0}")]
    UnknownZone(ZoneId),

    /// A referenced transport line does not exist in the network.
    #[error("unknown transport line: {0}")]
    UnknownLine(LineId),

    /// A line was declared from a zone to itself; commutes within one
    /// zone have zero duration by convention and use no line.
    #[error("zone {0} cannot be connected to itself")]
    SelfPair(ZoneId),
}
