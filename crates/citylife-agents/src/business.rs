//! Businesses, their rosters, and the employment lifecycle rules.
//!
//! A business is one of three kinds with fixed operating hours, daily
//! revenue, and maximum headcount. The capability set is
//! {hire, fire, check delays, calculate pay}:
//!
//! - delays are checked at the exact opening-time tick: an employee
//!   whose person is not working at that instant is late, and too many
//!   late arrivals get them fired;
//! - pay is calculated at the closing-time tick, splitting the daily
//!   revenue across the roster proportionally to experience.

use citylife_types::{Activity, BusinessId, DayTime, PersonId, Position, ZoneId};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::AgentError;

/// Late arrivals tolerated before an employee is fired.
pub const MAX_DELAYS: u32 = 3;

/// The size class of a business, fixing hours, revenue, and headcount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessKind {
    /// A small shop: short hours, few employees.
    Small,
    /// A mid-size office.
    Medium,
    /// A large plant: long hours, big roster.
    Big,
}

impl BusinessKind {
    /// Opening time of day.
    pub const fn opens(self) -> DayTime {
        match self {
            Self::Small => DayTime::from_seconds(28_800),  // 08:00
            Self::Medium => DayTime::from_seconds(32_400), // 09:00
            Self::Big => DayTime::from_seconds(21_600),    // 06:00
        }
    }

    /// Closing time of day.
    pub const fn closes(self) -> DayTime {
        match self {
            Self::Small => DayTime::from_seconds(43_200),  // 12:00
            Self::Medium => DayTime::from_seconds(61_200), // 17:00
            Self::Big => DayTime::from_seconds(64_800),    // 18:00
        }
    }

    /// Revenue accrued per working day, split across the roster as pay.
    pub const fn daily_revenue(self) -> u64 {
        match self {
            Self::Small => 1_000,
            Self::Medium => 5_000,
            Self::Big => 15_000,
        }
    }

    /// Maximum roster size.
    pub const fn max_employees(self) -> usize {
        match self {
            Self::Small => 4,
            Self::Medium => 10,
            Self::Big => 25,
        }
    }

    /// All kinds, in spawn-selection order.
    pub const ALL: [Self; 3] = [Self::Small, Self::Medium, Self::Big];
}

impl core::fmt::Display for BusinessKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Small => write!(f, "small"),
            Self::Medium => write!(f, "medium"),
            Self::Big => write!(f, "big"),
        }
    }
}

/// A roster entry. Owned by exactly one business at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// The underlying person.
    pub person_id: PersonId,
    /// Experience level, copied from the person at hire time.
    pub experience: u32,
    /// Late arrivals since hiring. Reset by the fire/re-hire cycle.
    pub delay_count: u32,
}

/// A business with fixed hours and a mutable employee roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Business {
    id: BusinessId,
    zone_id: ZoneId,
    position: Position,
    kind: BusinessKind,
    employees: Vec<Employee>,
}

impl Business {
    /// Create a business with an empty roster.
    pub fn new(zone_id: ZoneId, position: Position, kind: BusinessKind) -> Self {
        Self {
            id: BusinessId::new(),
            zone_id,
            position,
            kind,
            employees: Vec::new(),
        }
    }

    /// Unique identifier.
    pub const fn id(&self) -> BusinessId {
        self.id
    }

    /// The zone this business sits in.
    pub const fn zone_id(&self) -> ZoneId {
        self.zone_id
    }

    /// The business coordinate on the map.
    pub const fn position(&self) -> Position {
        self.position
    }

    /// The size class.
    pub const fn kind(&self) -> BusinessKind {
        self.kind
    }

    /// Opening time of day.
    pub const fn opens(&self) -> DayTime {
        self.kind.opens()
    }

    /// Closing time of day.
    pub const fn closes(&self) -> DayTime {
        self.kind.closes()
    }

    /// Current roster size.
    pub fn headcount(&self) -> usize {
        self.employees.len()
    }

    /// Open positions left on the roster.
    pub fn open_positions(&self) -> usize {
        self.kind.max_employees().saturating_sub(self.employees.len())
    }

    /// The current roster.
    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    /// Whether the given person is on the roster.
    pub fn employs(&self, person_id: PersonId) -> bool {
        self.employees.iter().any(|e| e.person_id == person_id)
    }

    /// Add a person to the roster with a fresh delay count.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::RosterFull`] at maximum headcount, or
    /// [`AgentError::AlreadyEmployed`] if the person is already hired.
    pub fn hire(&mut self, person_id: PersonId, experience: u32) -> Result<(), AgentError> {
        if self.employees.len() >= self.kind.max_employees() {
            return Err(AgentError::RosterFull {
                business: self.id,
                headcount: self.kind.max_employees(),
            });
        }
        if self.employs(person_id) {
            return Err(AgentError::AlreadyEmployed {
                person: person_id,
                business: self.id,
            });
        }
        self.employees.push(Employee {
            person_id,
            experience,
            delay_count: 0,
        });
        debug!(business = %self.id, person = %person_id, "hired");
        Ok(())
    }

    /// Remove a person from the roster.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::NotEmployed`] if the person is not on the
    /// roster.
    pub fn fire(&mut self, person_id: PersonId) -> Result<Employee, AgentError> {
        let index = self
            .employees
            .iter()
            .position(|e| e.person_id == person_id)
            .ok_or(AgentError::NotEmployed {
                person: person_id,
                business: self.id,
            })?;
        let employee = self.employees.remove(index);
        info!(business = %self.id, person = %person_id, delays = employee.delay_count, "fired");
        Ok(employee)
    }

    /// Check punctuality at the opening-time tick.
    ///
    /// Runs only when `now` equals the opening time exactly. An employee
    /// whose person is not working at that instant is late; exceeding
    /// [`MAX_DELAYS`] fires them. Returns the persons fired this tick,
    /// to be handed back to the unemployed pool.
    pub fn check_employee_delays(
        &mut self,
        now: DayTime,
        activity_of: impl Fn(PersonId) -> Option<Activity>,
    ) -> Vec<PersonId> {
        if now != self.opens() {
            return Vec::new();
        }
        let id = self.id;
        let mut fired = Vec::new();
        self.employees.retain_mut(|employee| {
            let working = activity_of(employee.person_id) == Some(Activity::Working);
            if working {
                return true;
            }
            employee.delay_count = employee.delay_count.saturating_add(1);
            debug!(
                business = %id,
                person = %employee.person_id,
                delays = employee.delay_count,
                "late arrival"
            );
            if employee.delay_count > MAX_DELAYS {
                fired.push(employee.person_id);
                return false;
            }
            true
        });
        for person in &fired {
            info!(business = %id, person = %person, "fired for repeated lateness");
        }
        fired
    }

    /// Split the daily revenue across the roster as pay.
    ///
    /// Employee *i* receives
    /// `daily_revenue * (1 + experience_i) / sum_j (1 + experience_j)`
    /// with integer division. Deterministic, monotonic in revenue and in
    /// experience; an empty roster pays nobody.
    pub fn calculate_pay(&self) -> Vec<(PersonId, u64)> {
        let total_weight: u64 = self
            .employees
            .iter()
            .map(|e| u64::from(e.experience).saturating_add(1))
            .fold(0_u64, u64::saturating_add);
        if total_weight == 0 {
            return Vec::new();
        }
        self.employees
            .iter()
            .map(|e| {
                let weight = u64::from(e.experience).saturating_add(1);
                let pay = self
                    .kind
                    .daily_revenue()
                    .saturating_mul(weight)
                    .checked_div(total_weight)
                    .unwrap_or(0);
                (e.person_id, pay)
            })
            .collect()
    }
}
