//! The zone-pair routing table.
//!
//! A [`TransportNetwork`] is built once during setup from the zone and
//! line definitions, then stays structurally read-only for the rest of
//! the simulation. The only runtime mutation is the occupancy counter
//! on each line, driven by persons boarding and leaving.
//!
//! Every unordered pair of distinct zones is connected by at most one
//! line. Lookups normalize the pair, so `trip_between(a, b)` and
//! `trip_between(b, a)` return the same route.

use std::collections::BTreeMap;

use citylife_types::{LineId, Position, ZoneId};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::WorldError;
use crate::transport::{TransportLine, is_congested};
use crate::zone::Zone;

/// The route between two zones, as resolved by the network.
///
/// A commute within a single zone uses no line and takes zero seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    /// The line serving the route, if the zones differ.
    pub line: Option<LineId>,
    /// Base travel duration in seconds (zero within one zone).
    pub duration_seconds: u32,
}

impl Trip {
    /// Whether this trip stays within a single zone.
    pub const fn is_local(&self) -> bool {
        self.line.is_none()
    }
}

/// Zones, transport lines, and the table mapping zone pairs to lines.
#[derive(Debug, Clone, Default)]
pub struct TransportNetwork {
    zones: BTreeMap<ZoneId, Zone>,
    lines: BTreeMap<LineId, TransportLine>,
    /// Normalized (smaller, larger) zone pair to serving line.
    table: BTreeMap<(ZoneId, ZoneId), LineId>,
}

/// Order a zone pair so both directions map to the same table key.
fn pair_key(a: ZoneId, b: ZoneId) -> (ZoneId, ZoneId) {
    if a <= b { (a, b) } else { (b, a) }
}

impl TransportNetwork {
    /// Create an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a zone.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateZone`] if a zone with the same
    /// name already exists; names are the zone's identity.
    pub fn add_zone(&mut self, zone: Zone) -> Result<ZoneId, WorldError> {
        if self.zones.values().any(|z| z.name == zone.name) {
            return Err(WorldError::DuplicateZone(zone.name));
        }
        let id = zone.id;
        debug!(zone = %zone.name, %id, "zone registered");
        self.zones.insert(id, zone);
        Ok(id)
    }

    /// Connect two distinct zones with a transport line.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::SelfPair`] if `a == b`,
    /// [`WorldError::UnknownZone`] if either zone is not registered,
    /// [`WorldError::DuplicatePair`] if the pair is already connected,
    /// or [`WorldError::DuplicateLine`] if the line ID is already used.
    pub fn connect(
        &mut self,
        a: ZoneId,
        b: ZoneId,
        line: TransportLine,
    ) -> Result<LineId, WorldError> {
        if a == b {
            return Err(WorldError::SelfPair(a));
        }
        if !self.zones.contains_key(&a) {
            return Err(WorldError::UnknownZone(a));
        }
        if !self.zones.contains_key(&b) {
            return Err(WorldError::UnknownZone(b));
        }
        let key = pair_key(a, b);
        if self.table.contains_key(&key) {
            return Err(WorldError::DuplicatePair { a: key.0, b: key.1 });
        }
        let line_id = line.id();
        if self.lines.contains_key(&line_id) {
            return Err(WorldError::DuplicateLine(line_id));
        }
        debug!(line = %line.name(), %line_id, "zones connected");
        self.lines.insert(line_id, line);
        self.table.insert(key, line_id);
        Ok(line_id)
    }

    /// Resolve the route between two zones.
    ///
    /// A same-zone query yields a local trip with no line and zero
    /// duration.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::RouteNotFound`] if the zones differ and no
    /// line connects them.
    pub fn trip_between(&self, from: ZoneId, to: ZoneId) -> Result<Trip, WorldError> {
        if from == to {
            return Ok(Trip {
                line: None,
                duration_seconds: 0,
            });
        }
        let line_id = self
            .table
            .get(&pair_key(from, to))
            .copied()
            .ok_or(WorldError::RouteNotFound { from, to })?;
        let duration_seconds = self
            .lines
            .get(&line_id)
            .map(TransportLine::duration_seconds)
            .ok_or(WorldError::UnknownLine(line_id))?;
        Ok(Trip {
            line: Some(line_id),
            duration_seconds,
        })
    }

    /// One person boards the given line.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownLine`] if the line is not registered.
    pub fn board(&mut self, line_id: LineId) -> Result<(), WorldError> {
        self.lines
            .get_mut(&line_id)
            .ok_or(WorldError::UnknownLine(line_id))
            .map(TransportLine::board)
    }

    /// One person leaves the given line.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownLine`] if the line is not registered.
    pub fn release(&mut self, line_id: LineId) -> Result<(), WorldError> {
        self.lines
            .get_mut(&line_id)
            .ok_or(WorldError::UnknownLine(line_id))
            .map(TransportLine::release)
    }

    /// Whether every line in the route is at capacity.
    ///
    /// Unknown line IDs are ignored; a route with no known lines is not
    /// congested.
    pub fn is_route_congested(&self, line_ids: &[LineId]) -> bool {
        is_congested(line_ids.iter().filter_map(|id| self.lines.get(id)))
    }

    /// Draw a random registered zone.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::NoZonesAvailable`] if no zones exist.
    pub fn random_zone<R: Rng>(&self, rng: &mut R) -> Result<&Zone, WorldError> {
        if self.zones.is_empty() {
            return Err(WorldError::NoZonesAvailable);
        }
        let index = rng.random_range(0..self.zones.len());
        self.zones
            .values()
            .nth(index)
            .ok_or(WorldError::NoZonesAvailable)
    }

    /// The zone whose boundary contains the given position, if any.
    ///
    /// Boundaries may touch at their inclusive edges; the first match in
    /// zone ID order wins.
    pub fn zone_at_position(&self, position: Position) -> Option<&Zone> {
        self.zones.values().find(|z| z.boundary.contains(position))
    }

    /// Look up a zone by ID.
    pub fn zone(&self, id: ZoneId) -> Option<&Zone> {
        self.zones.get(&id)
    }

    /// Look up a zone by its unique name.
    pub fn zone_by_name(&self, name: &str) -> Option<&Zone> {
        self.zones.values().find(|z| z.name == name)
    }

    /// Iterate over all zones in ID order.
    pub fn zones(&self) -> impl Iterator<Item = &Zone> {
        self.zones.values()
    }

    /// Number of registered zones.
    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    /// Look up a transport line by ID.
    pub fn line(&self, id: LineId) -> Option<&TransportLine> {
        self.lines.get(&id)
    }

    /// Iterate over all transport lines in ID order.
    pub fn lines(&self) -> impl Iterator<Item = &TransportLine> {
        self.lines.values()
    }
}
