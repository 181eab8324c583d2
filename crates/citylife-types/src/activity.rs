//! The per-person commute activity.
//!
//! A person is always in exactly one of three activities. Transitions
//! between them are driven by the commute state machine in
//! `citylife-agents` and are keyed on exact time-of-day matches.

use serde::{Deserialize, Serialize};

/// What a person is doing right now.
///
/// The three activities form a closed cycle: at home, moving to work,
/// working, moving home. No fourth state is reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    /// The person is at their residence.
    AtHome,
    /// The person is in transit on a transport line (or walking within
    /// their own zone on a zero-duration trip).
    Moving,
    /// The person is at their assigned business.
    Working,
}

impl core::fmt::Display for Activity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let label = match self {
            Self::AtHome => "at_home",
            Self::Moving => "moving",
            Self::Working => "working",
        };
        write!(f, "{label}")
    }
}
