//! Read-only snapshots of the city for presentation collaborators.
//!
//! A snapshot is captured after a tick completes, so consumers always
//! see a consistent state: never a partially-updated mid-tick view.
//! Everything here is JSON-serializable.

use citylife_types::{Activity, BusinessId, DayTime, LineId, PersonId, TrackedPosition, ZoneId};
use serde::{Deserialize, Serialize};

use crate::clock::TimeUpdate;
use crate::tick::{CityState, TickSummary};

/// One person's externally visible state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonSnapshot {
    /// Person identifier.
    pub id: PersonId,
    /// Person name.
    pub name: String,
    /// Current activity.
    pub activity: Activity,
    /// Current position (unknown while moving).
    pub position: TrackedPosition,
    /// Current money balance.
    pub money: u64,
}

/// One business's externally visible state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessSnapshot {
    /// Business identifier.
    pub id: BusinessId,
    /// Zone the business sits in.
    pub zone_id: ZoneId,
    /// Size class, as its display name.
    pub kind: String,
    /// Current roster size.
    pub headcount: usize,
    /// Open positions left on the roster.
    pub open_positions: usize,
}

/// One transport line's externally visible state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSnapshot {
    /// Line identifier.
    pub id: LineId,
    /// Line name.
    pub name: String,
    /// Passenger capacity.
    pub capacity: u32,
    /// Current occupant count.
    pub occupancy: u32,
}

/// The complete city state as of the last completed tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitySnapshot {
    /// Time of day of the completed tick.
    pub time: DayTime,
    /// Day of the completed tick.
    pub day: u32,
    /// All persons.
    pub people: Vec<PersonSnapshot>,
    /// All businesses.
    pub businesses: Vec<BusinessSnapshot>,
    /// All transport lines.
    pub lines: Vec<LineSnapshot>,
    /// Aggregate counters for the tick.
    pub summary: TickSummary,
}

impl CitySnapshot {
    /// Capture the city as of the end of a tick.
    pub fn capture(update: TimeUpdate, city: &CityState) -> Self {
        let people = city
            .people
            .values()
            .map(|p| PersonSnapshot {
                id: p.id(),
                name: p.name().to_owned(),
                activity: p.activity(),
                position: p.position(),
                money: p.money(),
            })
            .collect();
        let businesses = city
            .businesses
            .values()
            .map(|b| BusinessSnapshot {
                id: b.id(),
                zone_id: b.zone_id(),
                kind: b.kind().to_string(),
                headcount: b.headcount(),
                open_positions: b.open_positions(),
            })
            .collect();
        let lines = city
            .network
            .lines()
            .map(|l| LineSnapshot {
                id: l.id(),
                name: l.name().to_owned(),
                capacity: l.capacity(),
                occupancy: l.occupancy(),
            })
            .collect();
        Self {
            time: update.time,
            day: update.day,
            people,
            businesses,
            lines,
            summary: TickSummary::measure(update, city),
        }
    }
}
