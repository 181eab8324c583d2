//! The per-person commute state machine.
//!
//! A person alternates between three activities: at home, moving, and
//! working. Exactly one transition row is evaluated per tick:
//!
//! | Activity | Trigger                                  | Next     |
//! |----------|------------------------------------------|----------|
//! | at home  | now == opening time - trip duration      | moving   |
//! | working  | now == closing time                      | moving   |
//! | moving   | now == scheduled arrival                 | recorded |
//!
//! Triggers are exact-second equalities. A missed trigger (for example
//! while the clock is paused across the instant) is not an error; the
//! person waits for the next natural occurrence of the same condition
//! the following day.
//!
//! Commuting is bound to the person's assigned business and is
//! independent of whether the person currently sits on that business's
//! roster; employment only affects pay and delay tracking.

use citylife_types::{Activity, BusinessId, DayTime, PersonId, Position, TrackedPosition, ZoneId};
use citylife_world::network::{TransportNetwork, Trip};
use citylife_world::transport::calculate_arrival_time;
use citylife_world::zone::Zone;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::business::Business;
use crate::error::AgentError;

/// Uniform jitter applied to each axis of the working position, per tick.
pub const WORK_JITTER: i32 = 20;

/// The pending end of an in-flight trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct ScheduledArrival {
    /// Time of day at which the trip completes (stored modulo one day).
    at: DayTime,
    /// Activity to adopt on arrival.
    destination: Activity,
}

/// What, if anything, a person did on a given tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommuteEvent {
    /// The person boarded their line and started moving.
    Departed {
        /// Activity the person will adopt on arrival.
        destination: Activity,
        /// Scheduled arrival time of day.
        arrival: DayTime,
        /// Whether the route was congested at departure (trip lengthened).
        congested: bool,
    },
    /// The person completed a trip (or a zero-duration local commute).
    Arrived {
        /// The activity adopted.
        activity: Activity,
    },
}

/// A simulated resident with an assigned business and residence zone.
///
/// Identity data is fixed at creation; only the activity, position,
/// money balance, and in-flight trip bookkeeping change during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    id: PersonId,
    name: String,
    age: u8,
    experience: u32,
    business_id: BusinessId,
    residence_zone_id: ZoneId,
    activity: Activity,
    money: u64,
    position: TrackedPosition,
    home_position: Position,
    /// Route to the assigned business, resolved once at creation.
    trip: Trip,
    scheduled: Option<ScheduledArrival>,
}

impl Person {
    /// Create a person at home with a random position inside the
    /// residence zone and the route to their business resolved once.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::World`] if the network has no route between
    /// the residence zone and the business zone.
    pub fn new<R: Rng>(
        name: impl Into<String>,
        age: u8,
        experience: u32,
        residence_zone: &Zone,
        business: &Business,
        network: &TransportNetwork,
        starting_money: u64,
        rng: &mut R,
    ) -> Result<Self, AgentError> {
        let trip = network.trip_between(residence_zone.id, business.zone_id())?;
        let home_position = residence_zone.random_position(rng);
        Ok(Self {
            id: PersonId::new(),
            name: name.into(),
            age,
            experience,
            business_id: business.id(),
            residence_zone_id: residence_zone.id,
            activity: Activity::AtHome,
            money: starting_money,
            position: TrackedPosition::Known(home_position),
            home_position,
            trip,
            scheduled: None,
        })
    }

    /// Unique identifier.
    pub const fn id(&self) -> PersonId {
        self.id
    }

    /// The person's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Age in years, fixed at creation.
    pub const fn age(&self) -> u8 {
        self.age
    }

    /// Work experience level, used for pay distribution.
    pub const fn experience(&self) -> u32 {
        self.experience
    }

    /// The business this person commutes to.
    pub const fn business_id(&self) -> BusinessId {
        self.business_id
    }

    /// The zone this person lives in.
    pub const fn residence_zone_id(&self) -> ZoneId {
        self.residence_zone_id
    }

    /// Current activity.
    pub const fn activity(&self) -> Activity {
        self.activity
    }

    /// Current money balance.
    pub const fn money(&self) -> u64 {
        self.money
    }

    /// Current position (unknown while moving).
    pub const fn position(&self) -> TrackedPosition {
        self.position
    }

    /// The fixed home coordinate.
    pub const fn home_position(&self) -> Position {
        self.home_position
    }

    /// The resolved route to the assigned business.
    pub const fn trip(&self) -> Trip {
        self.trip
    }

    /// The scheduled arrival time of the in-flight trip, if any.
    pub fn scheduled_arrival(&self) -> Option<DayTime> {
        self.scheduled.map(|s| s.at)
    }

    /// Credit pay to the balance. Money never decreases during a run.
    pub fn add_money(&mut self, amount: u64) {
        self.money = self.money.saturating_add(amount);
        debug!(person = %self.id, amount, balance = self.money, "pay credited");
    }

    /// Evaluate the transition table for one tick.
    ///
    /// At most one row fires per call; when no trigger matches, a
    /// working person only refreshes their jittered position.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::World`] if boarding or releasing the
    /// assigned line fails, or [`AgentError::MissingArrival`] if the
    /// person is moving without trip bookkeeping.
    pub fn check_state<R: Rng>(
        &mut self,
        now: DayTime,
        business: &Business,
        network: &mut TransportNetwork,
        rng: &mut R,
    ) -> Result<Option<CommuteEvent>, AgentError> {
        match self.activity {
            Activity::AtHome => {
                let departure = business
                    .opens()
                    .wrapping_sub_seconds(self.trip.duration_seconds);
                if now == departure {
                    return self
                        .depart(now, Activity::Working, business, network, rng)
                        .map(Some);
                }
                Ok(None)
            }
            Activity::Working => {
                if now == business.closes() {
                    return self
                        .depart(now, Activity::AtHome, business, network, rng)
                        .map(Some);
                }
                // Working persons wander around the premises.
                self.position = TrackedPosition::Known(jittered(business.position(), rng));
                Ok(None)
            }
            Activity::Moving => {
                let scheduled = self.scheduled.ok_or(AgentError::MissingArrival(self.id))?;
                if now == scheduled.at {
                    return self
                        .arrive(scheduled.destination, business, network, rng)
                        .map(Some);
                }
                Ok(None)
            }
        }
    }

    /// Begin a trip toward `destination`.
    ///
    /// A zero-duration local commute collapses to an immediate arrival
    /// and never enters the moving state. On a congested route the trip
    /// duration for this leg is doubled before computing the arrival.
    fn depart<R: Rng>(
        &mut self,
        now: DayTime,
        destination: Activity,
        business: &Business,
        network: &mut TransportNetwork,
        rng: &mut R,
    ) -> Result<CommuteEvent, AgentError> {
        let Some(line) = self.trip.line else {
            return self.arrive(destination, business, network, rng);
        };

        let congested = network.is_route_congested(&[line]);
        let duration = if congested {
            self.trip.duration_seconds.saturating_mul(2)
        } else {
            self.trip.duration_seconds
        };
        let arrival = calculate_arrival_time(now, duration);

        network.board(line)?;
        self.activity = Activity::Moving;
        self.position = TrackedPosition::InTransit;
        self.scheduled = Some(ScheduledArrival {
            at: arrival,
            destination,
        });
        debug!(
            person = %self.id,
            %destination,
            %arrival,
            congested,
            "departed"
        );
        Ok(CommuteEvent::Departed {
            destination,
            arrival,
            congested,
        })
    }

    /// Complete the in-flight trip and adopt the destination activity.
    fn arrive<R: Rng>(
        &mut self,
        destination: Activity,
        business: &Business,
        network: &mut TransportNetwork,
        rng: &mut R,
    ) -> Result<CommuteEvent, AgentError> {
        if self.activity == Activity::Moving
            && let Some(line) = self.trip.line
        {
            network.release(line)?;
        }
        self.activity = destination;
        self.position = match destination {
            Activity::Working => TrackedPosition::Known(jittered(business.position(), rng)),
            _ => TrackedPosition::Known(self.home_position),
        };
        self.scheduled = None;
        debug!(person = %self.id, activity = %destination, "arrived");
        Ok(CommuteEvent::Arrived {
            activity: destination,
        })
    }
}

/// The business coordinate plus uniform jitter on each axis.
fn jittered<R: Rng>(base: Position, rng: &mut R) -> Position {
    let dx = rng.random_range(-WORK_JITTER..=WORK_JITTER);
    let dy = rng.random_range(-WORK_JITTER..=WORK_JITTER);
    Position::new(base.x.saturating_add(dx), base.y.saturating_add(dy))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::business::BusinessKind;
    use citylife_world::transport::TransportLine;
    use citylife_world::zone::{Boundary, IncomeRange};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    struct Fixture {
        network: TransportNetwork,
        home: Zone,
        business: Business,
        person: Person,
        rng: StdRng,
    }

    fn commuter_fixture() -> Fixture {
        let mut rng = StdRng::seed_from_u64(42);
        let mut network = TransportNetwork::new();
        let home = Zone::new(
            "Residencial",
            Boundary::new(0, 0, 100, 100),
            40,
            IncomeRange::new(500, 1500),
        );
        let work = Zone::new(
            "Industrial",
            Boundary::new(500, 0, 100, 100),
            60,
            IncomeRange::new(500, 1500),
        );
        let home_id = network.add_zone(home.clone()).unwrap();
        let work_id = network.add_zone(work.clone()).unwrap();
        network
            .connect(home_id, work_id, TransportLine::new("Line 1", 10, 30))
            .unwrap();
        // Small businesses open 08:00 and close 12:00.
        let business = Business::new(work_id, Position::new(550, 50), BusinessKind::Small);
        let person = Person::new(
            "Ada",
            30,
            5,
            &home,
            &business,
            &network,
            1000,
            &mut rng,
        )
        .unwrap();
        Fixture {
            network,
            home,
            business,
            person,
            rng,
        }
    }

    fn at(h: u32, m: u32, s: u32) -> DayTime {
        DayTime::from_hms(h, m, s).unwrap()
    }

    #[test]
    fn full_commute_day() {
        let mut f = commuter_fixture();
        let line = f.person.trip().line.unwrap();

        // Before the departure trigger nothing happens.
        let event = f
            .person
            .check_state(at(7, 0, 0), &f.business, &mut f.network, &mut f.rng)
            .unwrap();
        assert!(event.is_none());
        assert_eq!(f.person.activity(), Activity::AtHome);

        // Departure at opening minus trip duration (08:00 - 30 min).
        let event = f
            .person
            .check_state(at(7, 30, 0), &f.business, &mut f.network, &mut f.rng)
            .unwrap();
        assert!(matches!(
            event,
            Some(CommuteEvent::Departed {
                destination: Activity::Working,
                congested: false,
                ..
            })
        ));
        assert_eq!(f.person.activity(), Activity::Moving);
        assert!(f.person.position().is_in_transit());
        assert_eq!(f.network.line(line).unwrap().occupancy(), 1);
        assert_eq!(f.person.scheduled_arrival(), Some(at(8, 0, 0)));

        // Mid-trip ticks do nothing.
        let event = f
            .person
            .check_state(at(7, 45, 0), &f.business, &mut f.network, &mut f.rng)
            .unwrap();
        assert!(event.is_none());
        assert_eq!(f.person.activity(), Activity::Moving);

        // Arrival at the exact scheduled second.
        let event = f
            .person
            .check_state(at(8, 0, 0), &f.business, &mut f.network, &mut f.rng)
            .unwrap();
        assert!(matches!(
            event,
            Some(CommuteEvent::Arrived {
                activity: Activity::Working
            })
        ));
        assert_eq!(f.network.line(line).unwrap().occupancy(), 0);

        // Working position carries bounded jitter around the premises.
        let p = f.person.position().known().unwrap();
        assert!(p.x.abs_diff(f.business.position().x) <= WORK_JITTER.unsigned_abs());
        assert!(p.y.abs_diff(f.business.position().y) <= WORK_JITTER.unsigned_abs());

        // Closing time starts the return leg.
        let event = f
            .person
            .check_state(at(12, 0, 0), &f.business, &mut f.network, &mut f.rng)
            .unwrap();
        assert!(matches!(
            event,
            Some(CommuteEvent::Departed {
                destination: Activity::AtHome,
                ..
            })
        ));
        assert_eq!(f.network.line(line).unwrap().occupancy(), 1);

        // Home again at 12:30, back at the fixed home coordinate.
        let event = f
            .person
            .check_state(at(12, 30, 0), &f.business, &mut f.network, &mut f.rng)
            .unwrap();
        assert!(matches!(
            event,
            Some(CommuteEvent::Arrived {
                activity: Activity::AtHome
            })
        ));
        assert_eq!(
            f.person.position().known().unwrap(),
            f.person.home_position()
        );
        assert_eq!(f.network.line(line).unwrap().occupancy(), 0);
    }

    #[test]
    fn missed_trigger_waits_for_next_cycle() {
        let mut f = commuter_fixture();
        // The departure instant was skipped; the person stays home.
        let event = f
            .person
            .check_state(at(7, 30, 1), &f.business, &mut f.network, &mut f.rng)
            .unwrap();
        assert!(event.is_none());
        assert_eq!(f.person.activity(), Activity::AtHome);
    }

    #[test]
    fn congested_route_doubles_the_trip() {
        let mut f = commuter_fixture();
        let line = f.person.trip().line.unwrap();
        // Fill the line to capacity before the person departs.
        for _ in 0..f.network.line(line).unwrap().capacity() {
            f.network.board(line).unwrap();
        }

        let event = f
            .person
            .check_state(at(7, 30, 0), &f.business, &mut f.network, &mut f.rng)
            .unwrap();
        assert!(matches!(
            event,
            Some(CommuteEvent::Departed {
                congested: true,
                ..
            })
        ));
        // 30-minute base trip became an hour.
        assert_eq!(f.person.scheduled_arrival(), Some(at(8, 30, 0)));
    }

    #[test]
    fn local_commute_never_enters_moving() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut network = TransportNetwork::new();
        let zone = Zone::new(
            "Centro",
            Boundary::new(0, 0, 100, 100),
            100,
            IncomeRange::new(500, 1500),
        );
        network.add_zone(zone.clone()).unwrap();
        let business = Business::new(zone.id, Position::new(50, 50), BusinessKind::Small);
        let mut person = Person::new(
            "Bo", 40, 2, &zone, &business, &network, 800, &mut rng,
        )
        .unwrap();
        assert!(person.trip().is_local());

        // Departure trigger is the opening time itself; the person is
        // instantly at work.
        let event = person
            .check_state(at(8, 0, 0), &business, &mut network, &mut rng)
            .unwrap();
        assert!(matches!(
            event,
            Some(CommuteEvent::Arrived {
                activity: Activity::Working
            })
        ));
        assert_eq!(person.activity(), Activity::Working);

        let event = person
            .check_state(at(12, 0, 0), &business, &mut network, &mut rng)
            .unwrap();
        assert!(matches!(
            event,
            Some(CommuteEvent::Arrived {
                activity: Activity::AtHome
            })
        ));
    }

    #[test]
    fn overnight_trip_stays_moving_across_midnight() {
        // An 8-hour line toward a business opening at 06:00: the
        // departure trigger lands at 22:00 the previous evening.
        let mut rng = StdRng::seed_from_u64(3);
        let mut network = TransportNetwork::new();
        let home = Zone::new(
            "Residencial",
            Boundary::new(0, 0, 100, 100),
            40,
            IncomeRange::new(500, 1500),
        );
        let work = Zone::new(
            "Industrial",
            Boundary::new(500, 0, 100, 100),
            60,
            IncomeRange::new(500, 1500),
        );
        let home_id = network.add_zone(home.clone()).unwrap();
        let work_id = network.add_zone(work.clone()).unwrap();
        network
            .connect(home_id, work_id, TransportLine::new("Night Line", 10, 480))
            .unwrap();
        let business = Business::new(work_id, Position::new(550, 50), BusinessKind::Big);
        let mut person = Person::new(
            "Noa", 28, 1, &home, &business, &network, 600, &mut rng,
        )
        .unwrap();

        let event = person
            .check_state(at(22, 0, 0), &business, &mut network, &mut rng)
            .unwrap();
        assert!(matches!(
            event,
            Some(CommuteEvent::Departed {
                destination: Activity::Working,
                ..
            })
        ));
        // The arrival wraps modulo one day to the next morning.
        assert_eq!(person.scheduled_arrival(), Some(at(6, 0, 0)));

        // Still moving on both sides of the rollover.
        let event = person
            .check_state(at(23, 59, 0), &business, &mut network, &mut rng)
            .unwrap();
        assert!(event.is_none());
        let event = person
            .check_state(at(0, 1, 0), &business, &mut network, &mut rng)
            .unwrap();
        assert!(event.is_none());
        assert_eq!(person.activity(), Activity::Moving);

        // The next day's 06:00 tick matches the stored arrival.
        let event = person
            .check_state(at(6, 0, 0), &business, &mut network, &mut rng)
            .unwrap();
        assert!(matches!(
            event,
            Some(CommuteEvent::Arrived {
                activity: Activity::Working
            })
        ));
    }

    #[test]
    fn working_person_refreshes_jitter_each_tick() {
        let mut f = commuter_fixture();
        f.person
            .check_state(at(7, 30, 0), &f.business, &mut f.network, &mut f.rng)
            .unwrap();
        f.person
            .check_state(at(8, 0, 0), &f.business, &mut f.network, &mut f.rng)
            .unwrap();

        let mut seen = std::collections::BTreeSet::new();
        for minute in 1..30 {
            f.person
                .check_state(at(8, minute, 0), &f.business, &mut f.network, &mut f.rng)
                .unwrap();
            let p = f.person.position().known().unwrap();
            assert!(p.x.abs_diff(f.business.position().x) <= WORK_JITTER.unsigned_abs());
            assert!(p.y.abs_diff(f.business.position().y) <= WORK_JITTER.unsigned_abs());
            seen.insert((p.x, p.y));
        }
        // The jitter is re-drawn each tick, so positions vary.
        assert!(seen.len() > 1);
    }

    #[test]
    fn pay_is_monotonic() {
        let mut f = commuter_fixture();
        let before = f.person.money();
        f.person.add_money(0);
        f.person.add_money(250);
        assert_eq!(f.person.money(), before.saturating_add(250));
        f.person.add_money(u64::MAX);
        assert_eq!(f.person.money(), u64::MAX);
    }

    #[test]
    fn home_position_is_inside_residence_zone() {
        let f = commuter_fixture();
        assert!(f.home.boundary.contains(f.person.home_position()));
    }
}
