//! Transport lines and the stateless congestion strategy.
//!
//! A [`TransportLine`] connects two zones (the pairing lives in the
//! [`TransportNetwork`]) and tracks how many persons are currently
//! riding it. Capacity is a congestion threshold only, not an admission
//! limit: a line can run over capacity.
//!
//! The strategy functions at the bottom are pure logic over a set of
//! lines relevant to one trip. Congestion is a property of the whole
//! route option set: a single under-capacity line in the set is enough
//! to report "not congested".
//!
//! [`TransportNetwork`]: crate::network::TransportNetwork

use citylife_types::{DayTime, LineId};
use serde::{Deserialize, Serialize};

/// A transport line with live passenger occupancy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportLine {
    /// Unique identifier.
    id: LineId,
    /// Human-readable name, e.g. "Line 3".
    name: String,
    /// Passenger capacity (congestion threshold, not a hard cap).
    capacity: u32,
    /// Number of persons currently riding the line.
    occupancy: u32,
    /// Base trip duration in minutes.
    duration_minutes: u32,
}

impl TransportLine {
    /// Create a line with a freshly generated ID and zero occupancy.
    pub fn new(name: impl Into<String>, capacity: u32, duration_minutes: u32) -> Self {
        Self {
            id: LineId::new(),
            name: name.into(),
            capacity,
            occupancy: 0,
            duration_minutes,
        }
    }

    /// Return the line identifier.
    pub const fn id(&self) -> LineId {
        self.id
    }

    /// Return the line name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the passenger capacity.
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Return the current occupant count.
    pub const fn occupancy(&self) -> u32 {
        self.occupancy
    }

    /// Return the base trip duration in minutes.
    pub const fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    /// Return the base trip duration in seconds.
    pub const fn duration_seconds(&self) -> u32 {
        self.duration_minutes.saturating_mul(60)
    }

    /// Whether occupancy has reached (or passed) capacity.
    pub const fn is_at_capacity(&self) -> bool {
        self.occupancy >= self.capacity
    }

    /// One person boards the line. Occupancy is not capped: capacity is
    /// only a congestion threshold.
    pub const fn board(&mut self) {
        self.occupancy = self.occupancy.saturating_add(1);
    }

    /// One person leaves the line. Occupancy saturates at zero.
    pub const fn release(&mut self) {
        self.occupancy = self.occupancy.saturating_sub(1);
    }
}

/// Whether a whole route option set is congested.
///
/// Returns `true` iff the set is non-empty and every line in it has
/// occupancy at or above capacity. An empty set (a commute within one
/// zone) is never congested.
pub fn is_congested<'a, I>(lines: I) -> bool
where
    I: IntoIterator<Item = &'a TransportLine>,
{
    let mut any = false;
    for line in lines {
        if !line.is_at_capacity() {
            return false;
        }
        any = true;
    }
    any
}

/// Compute the scheduled arrival time for a trip.
///
/// The strategy performs the unconditional addition; callers lengthen
/// `trip_duration_seconds` beforehand when the route is congested.
/// Arrivals wrap modulo one day so midnight-crossing trips stay
/// matchable the next day.
pub const fn calculate_arrival_time(current: DayTime, trip_duration_seconds: u32) -> DayTime {
    current.wrapping_add_seconds(trip_duration_seconds)
}
