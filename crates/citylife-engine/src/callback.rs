//! Tick callback wiring snapshots and the per-day report.
//!
//! The runner invokes the callback after each completed tick. The
//! callback publishes a [`CitySnapshot`] into shared state (the hook a
//! presentation collaborator would read) and logs an aggregate report
//! at every day rollover.

use std::sync::{Arc, RwLock};

use citylife_core::{CitySnapshot, CityState, TickCallback, TickSummary, TimeUpdate};
use tracing::{info, warn};

/// Shared handle to the most recent end-of-tick snapshot.
pub type SnapshotHandle = Arc<RwLock<Option<CitySnapshot>>>;

/// Publishes a snapshot per tick and a report per day.
#[derive(Debug)]
pub struct SnapshotCallback {
    latest: SnapshotHandle,
    last_day: Option<u32>,
}

impl SnapshotCallback {
    /// Create a callback with a fresh, empty snapshot slot.
    pub fn new() -> Self {
        Self {
            latest: Arc::new(RwLock::new(None)),
            last_day: None,
        }
    }

    /// A shared handle external readers can poll. The slot always holds
    /// the state as of the most recently completed tick.
    pub fn handle(&self) -> SnapshotHandle {
        Arc::clone(&self.latest)
    }
}

impl Default for SnapshotCallback {
    fn default() -> Self {
        Self::new()
    }
}

impl TickCallback for SnapshotCallback {
    fn on_tick(&mut self, summary: &TickSummary, city: &CityState) {
        if self.last_day != Some(summary.day) {
            info!(
                day = summary.day,
                employed = summary.employed,
                unemployed = summary.unemployed,
                total_money = summary.total_money,
                "day report"
            );
        }
        self.last_day = Some(summary.day);

        let update = TimeUpdate {
            time: summary.time,
            day: summary.day,
        };
        let snapshot = CitySnapshot::capture(update, city);
        match self.latest.write() {
            Ok(mut slot) => *slot = Some(snapshot),
            Err(_poisoned) => warn!("snapshot slot poisoned; skipping publish"),
        }
    }
}
