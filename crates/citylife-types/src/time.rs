//! Seconds-of-day wall time for the simulation.
//!
//! All scheduling in the simulation (departures, arrivals, opening and
//! closing times) compares [`DayTime`] values for exact equality, so the
//! representation is a plain second count in `[0, 86_400)`. Arithmetic
//! helpers keep the value in range and report midnight crossings to the
//! clock.

use serde::{Deserialize, Serialize};

/// Number of seconds in one simulated day.
pub const SECONDS_PER_DAY: u32 = 86_400;

/// A wall-clock time of day, stored as seconds since midnight.
///
/// The inner value is always in `[0, SECONDS_PER_DAY)`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct DayTime(u32);

impl DayTime {
    /// Midnight, the start of every simulated day.
    pub const MIDNIGHT: Self = Self(0);

    /// Build a time of day from hours, minutes, and seconds.
    ///
    /// Returns `None` if any component is out of range (hours >= 24,
    /// minutes or seconds >= 60).
    pub const fn from_hms(hours: u32, minutes: u32, seconds: u32) -> Option<Self> {
        if hours >= 24 || minutes >= 60 || seconds >= 60 {
            return None;
        }
        // Bounds above keep the sum below 86_400; saturation is unreachable.
        let total = hours
            .saturating_mul(3600)
            .saturating_add(minutes.saturating_mul(60))
            .saturating_add(seconds);
        Some(Self(total))
    }

    /// Build a time of day from a raw second count, wrapping modulo one day.
    pub const fn from_seconds(seconds: u32) -> Self {
        Self(seconds % SECONDS_PER_DAY)
    }

    /// Return the second count since midnight.
    pub const fn seconds(self) -> u32 {
        self.0
    }

    /// Return the hour component (0-23).
    pub const fn hour(self) -> u32 {
        self.0 / 3600
    }

    /// Return the minute component (0-59).
    pub const fn minute(self) -> u32 {
        (self.0 / 60) % 60
    }

    /// Advance by `seconds`, reporting whether midnight was crossed.
    ///
    /// `seconds` must be at most one day; larger steps are clamped to a
    /// single wrap. The returned flag is `true` when the new value
    /// wrapped past midnight.
    pub const fn advance(self, seconds: u32) -> (Self, bool) {
        let total = self.0.saturating_add(seconds);
        if total >= SECONDS_PER_DAY {
            (Self(total % SECONDS_PER_DAY), true)
        } else {
            (Self(total), false)
        }
    }

    /// Add `seconds`, wrapping modulo one day.
    ///
    /// Used for scheduled arrival times: a trip that crosses midnight
    /// stays matchable against a time-of-day equality the next day.
    pub const fn wrapping_add_seconds(self, seconds: u32) -> Self {
        let total = (self.0 as u64).saturating_add(seconds as u64);
        // Remainder is < 86_400, so the narrowing cast cannot truncate.
        #[allow(clippy::cast_possible_truncation)]
        let wrapped = (total % SECONDS_PER_DAY as u64) as u32;
        Self(wrapped)
    }

    /// Subtract `seconds`, returning `None` if the result would be before
    /// midnight of the same day.
    pub const fn checked_sub_seconds(self, seconds: u32) -> Option<Self> {
        match self.0.checked_sub(seconds) {
            Some(rest) => Some(Self(rest)),
            None => None,
        }
    }

    /// Subtract `seconds`, wrapping modulo one day.
    ///
    /// Used for departure schedules: a commute toward an early-morning
    /// opening time may have to leave before midnight.
    pub const fn wrapping_sub_seconds(self, seconds: u32) -> Self {
        let sub = seconds % SECONDS_PER_DAY;
        if self.0 >= sub {
            // In-range operands, cannot underflow.
            Self(self.0.saturating_sub(sub))
        } else {
            let wrapped = SECONDS_PER_DAY.saturating_sub(sub).saturating_add(self.0);
            Self(wrapped % SECONDS_PER_DAY)
        }
    }
}

impl core::fmt::Display for DayTime {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hour(),
            self.minute(),
            self.0 % 60
        )
    }
}
