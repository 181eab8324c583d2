//! Operator control state for runtime simulation management.
//!
//! An external control surface (a UI button, a command channel) can
//! pause and resume the run, change the tick pacing, or request a clean
//! stop. All control fields are atomics wrapped in [`Arc`] by the
//! caller, so the tick loop reads them lock-free on its hot path.
//!
//! Pausing is a cooperative stop of tick emission: a paused simulation
//! leaves every person, business, and transport line exactly as of the
//! last completed tick.
//!
//! [`Arc`]: std::sync::Arc

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tokio::sync::Notify;

use crate::clock::ClockError;

/// Reason why the simulation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationEndReason {
    /// The clock completed its configured number of days.
    DaysCompleted,
    /// An operator issued a stop command.
    OperatorStop,
}

/// Shared operator control state.
///
/// Wrapped in an `Arc` and shared between the tick loop and whatever
/// control surface drives it.
#[derive(Debug)]
pub struct OperatorControls {
    /// Whether tick emission is currently suspended.
    paused: AtomicBool,

    /// Notification used to wake the tick loop when resumed.
    resume_notify: Notify,

    /// Whether a clean stop has been requested.
    stop_requested: AtomicBool,

    /// Wall-clock milliseconds between ticks (runtime-adjustable).
    update_rate_ms: AtomicU64,
}

impl OperatorControls {
    /// Create control state with the given initial pacing.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfiguration`] if `update_rate_ms`
    /// is zero; the same rule [`set_update_rate_ms`](Self::set_update_rate_ms)
    /// enforces at runtime applies at startup.
    pub fn new(update_rate_ms: u64) -> Result<Self, ClockError> {
        if update_rate_ms == 0 {
            return Err(ClockError::InvalidConfiguration {
                reason: "update_rate_ms must be at least 1".to_owned(),
            });
        }
        Ok(Self {
            paused: AtomicBool::new(false),
            resume_notify: Notify::new(),
            stop_requested: AtomicBool::new(false),
            update_rate_ms: AtomicU64::new(update_rate_ms),
        })
    }

    /// Check whether the simulation is paused.
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Suspend tick emission. Elapsed time-of-day and the day counter
    /// are untouched.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::Release);
    }

    /// Resume tick emission and wake the tick loop.
    pub fn resume(&self) {
        self.paused.store(false, Ordering::Release);
        self.resume_notify.notify_one();
    }

    /// Wait until the simulation is no longer paused.
    ///
    /// Returns immediately if not paused. Otherwise blocks until
    /// [`resume`](Self::resume) is called.
    pub async fn wait_if_paused(&self) {
        while self.paused.load(Ordering::Acquire) {
            self.resume_notify.notified().await;
        }
    }

    /// Request a clean stop at the next tick boundary. There is no
    /// cancellation mid-tick; an in-flight tick runs to completion.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
        // A paused loop must wake up to observe the stop.
        self.resume_notify.notify_one();
    }

    /// Check whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    /// Current wall-clock milliseconds between ticks.
    pub fn update_rate_ms(&self) -> u64 {
        self.update_rate_ms.load(Ordering::Acquire)
    }

    /// Change the pacing without restarting the run.
    ///
    /// Returns the previous rate on success, or `None` if the value was
    /// rejected (a non-positive rate is an invalid configuration).
    pub fn set_update_rate_ms(&self, ms: u64) -> Option<u64> {
        if ms == 0 {
            return None;
        }
        let prev = self.update_rate_ms.swap(ms, Ordering::AcqRel);
        Some(prev)
    }
}
