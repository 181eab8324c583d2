//! The simulation clock.
//!
//! The clock is the single source of simulated time. It advances the
//! time of day by a fixed increment per tick, rolls the day counter at
//! midnight, and stops after the configured number of days. Notifying
//! observers is the tick loop's job ([`crate::tick`]); the clock only
//! produces [`TimeUpdate`] values.
//!
//! # Design
//!
//! - `seconds_per_tick` must divide one day exactly, so that every
//!   exact-second trigger (departures, openings, closings, arrivals)
//!   lands on a tick boundary on every day of the run.
//! - The day counter starts at 0. The advance that completes the Nth
//!   midnight rollover of an N-day run finishes the clock and is not
//!   emitted.

use citylife_types::{DayTime, SECONDS_PER_DAY};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Errors that can occur when constructing the clock or its pacing.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Invalid clock configuration (zero rate, non-dividing increment).
    #[error("invalid clock configuration: {reason}")]
    InvalidConfiguration {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

/// The payload delivered to every observer once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeUpdate {
    /// Current simulated time of day.
    pub time: DayTime,
    /// Current day, starting at 0.
    pub day: u32,
}

/// Simulated wall clock for a fixed-length run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimClock {
    time: DayTime,
    day: u32,
    total_days: u32,
    seconds_per_tick: u32,
    finished: bool,
}

impl SimClock {
    /// Create a clock at midnight of day 0.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfiguration`] if `total_days` is
    /// zero, or if `seconds_per_tick` is zero or does not divide one
    /// day exactly.
    pub fn new(seconds_per_tick: u32, total_days: u32) -> Result<Self, ClockError> {
        if seconds_per_tick == 0 {
            return Err(ClockError::InvalidConfiguration {
                reason: "seconds_per_tick must be at least 1".to_owned(),
            });
        }
        if !SECONDS_PER_DAY.is_multiple_of(seconds_per_tick) {
            return Err(ClockError::InvalidConfiguration {
                reason: format!(
                    "seconds_per_tick {seconds_per_tick} must divide {SECONDS_PER_DAY} exactly"
                ),
            });
        }
        if total_days == 0 {
            return Err(ClockError::InvalidConfiguration {
                reason: "total_days must be at least 1".to_owned(),
            });
        }
        Ok(Self {
            time: DayTime::MIDNIGHT,
            day: 0,
            total_days,
            seconds_per_tick,
            finished: false,
        })
    }

    /// Advance by one tick.
    ///
    /// Returns the update to broadcast, or `None` once the run is
    /// complete. The advance that completes the final midnight rollover
    /// finishes the clock without being emitted.
    pub fn advance(&mut self) -> Option<TimeUpdate> {
        if self.finished {
            return None;
        }
        let (next, crossed_midnight) = self.time.advance(self.seconds_per_tick);
        self.time = next;
        if crossed_midnight {
            self.day = self.day.saturating_add(1);
            if self.day >= self.total_days {
                self.finished = true;
                info!(days = self.total_days, "clock finished");
                return None;
            }
        }
        Some(TimeUpdate {
            time: self.time,
            day: self.day,
        })
    }

    /// Current simulated time of day.
    pub const fn time(&self) -> DayTime {
        self.time
    }

    /// Current day counter (0-based).
    pub const fn day(&self) -> u32 {
        self.day
    }

    /// Configured run length in days.
    pub const fn total_days(&self) -> u32 {
        self.total_days
    }

    /// Simulated seconds added per tick.
    pub const fn seconds_per_tick(&self) -> u32 {
        self.seconds_per_tick
    }

    /// Number of ticks in one simulated day.
    pub const fn ticks_per_day(&self) -> u32 {
        // Constructor guarantees the divisor is nonzero and divides exactly.
        match SECONDS_PER_DAY.checked_div(self.seconds_per_tick) {
            Some(ticks) => ticks,
            None => 0,
        }
    }

    /// Whether the run is complete.
    pub const fn is_finished(&self) -> bool {
        self.finished
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn clock_starts_at_midnight_day_zero() {
        let clock = SimClock::new(60, 2).unwrap();
        assert_eq!(clock.time(), DayTime::MIDNIGHT);
        assert_eq!(clock.day(), 0);
        assert!(!clock.is_finished());
    }

    #[test]
    fn first_tick_is_one_increment_past_midnight() {
        let mut clock = SimClock::new(60, 2).unwrap();
        let update = clock.advance().unwrap();
        assert_eq!(update.time, DayTime::from_hms(0, 1, 0).unwrap());
        assert_eq!(update.day, 0);
    }

    #[test]
    fn day_rolls_over_at_midnight() {
        let mut clock = SimClock::new(3600, 3).unwrap();
        for _ in 0..23 {
            clock.advance().unwrap();
        }
        let update = clock.advance().unwrap();
        assert_eq!(update.day, 1);
        assert_eq!(update.time, DayTime::MIDNIGHT);
    }

    #[test]
    fn stops_exactly_after_n_rollovers() {
        let days = 2;
        let mut clock = SimClock::new(3600, days).unwrap();
        let mut emitted = 0_u32;
        while clock.advance().is_some() {
            emitted = emitted.saturating_add(1);
        }
        assert!(clock.is_finished());
        // Each day yields 24 ticks; the final rollover tick is withheld.
        assert_eq!(emitted, 47);
        // A finished clock stays finished.
        assert!(clock.advance().is_none());
    }

    #[test]
    fn rejects_zero_rate() {
        assert!(matches!(
            SimClock::new(0, 1),
            Err(ClockError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn rejects_non_dividing_increment() {
        assert!(matches!(
            SimClock::new(7, 1),
            Err(ClockError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn rejects_zero_days() {
        assert!(matches!(
            SimClock::new(60, 0),
            Err(ClockError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn ticks_per_day_matches_rate() {
        let clock = SimClock::new(60, 1).unwrap();
        assert_eq!(clock.ticks_per_day(), 1440);
    }
}
