//! The async tick loop.
//!
//! One logical driver: the clock emits ticks one at a time, every
//! observer runs synchronously within the tick, and only then does the
//! loop sleep for the operator-controlled pacing interval. There is no
//! concurrent tick overlap and no cancellation mid-tick.

use std::time::Duration;

use tracing::info;

use crate::clock::SimClock;
use crate::operator::{OperatorControls, SimulationEndReason};
use crate::tick::{CityState, ObserverRegistry, TickError, TickSummary, run_tick};

/// Errors that can abort the tick loop.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// An observer pass failed; the run cannot continue consistently.
    #[error(transparent)]
    Tick(#[from] TickError),
}

/// Per-tick hook for presentation and dataset collaborators.
///
/// Called after the tick's observers have all returned, so the city
/// argument is always a consistent end-of-tick state.
pub trait TickCallback: Send {
    /// Handle one completed tick.
    fn on_tick(&mut self, summary: &TickSummary, city: &CityState);
}

/// A callback that does nothing. Useful for headless runs and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _summary: &TickSummary, _city: &CityState) {}
}

/// How a finished run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationReport {
    /// Why the loop exited.
    pub end_reason: SimulationEndReason,
    /// Ticks completed.
    pub ticks: u64,
    /// Day counter at exit.
    pub days: u32,
}

/// Drive the simulation until the clock finishes or a stop is requested.
///
/// Pausing via the operator controls suspends tick emission without
/// touching any state; resuming continues from the exact same instant.
///
/// # Errors
///
/// Returns [`RunnerError::Tick`] if an observer pass fails.
pub async fn run_simulation(
    clock: &mut SimClock,
    city: &mut CityState,
    registry: &mut ObserverRegistry,
    controls: &OperatorControls,
    callback: &mut dyn TickCallback,
) -> Result<SimulationReport, RunnerError> {
    let mut ticks = 0_u64;
    info!(
        days = clock.total_days(),
        seconds_per_tick = clock.seconds_per_tick(),
        "simulation started"
    );
    loop {
        controls.wait_if_paused().await;
        if controls.is_stop_requested() {
            info!(ticks, day = clock.day(), "simulation stopped by operator");
            return Ok(SimulationReport {
                end_reason: SimulationEndReason::OperatorStop,
                ticks,
                days: clock.day(),
            });
        }
        let Some(update) = clock.advance() else {
            info!(ticks, days = clock.total_days(), "simulation completed");
            return Ok(SimulationReport {
                end_reason: SimulationEndReason::DaysCompleted,
                ticks,
                days: clock.total_days(),
            });
        };
        let summary = run_tick(city, registry, update)?;
        callback.on_tick(&summary, city);
        ticks = ticks.saturating_add(1);

        tokio::time::sleep(Duration::from_millis(controls.update_rate_ms())).await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn empty_city() -> CityState {
        CityState::new(citylife_world::TransportNetwork::new(), 1)
    }

    #[tokio::test]
    async fn runs_to_completion() {
        let mut clock = SimClock::new(3600, 1).unwrap();
        let mut city = empty_city();
        let mut registry = ObserverRegistry::standard();
        let controls = OperatorControls::new(1).unwrap();
        let mut callback = NoOpCallback;

        let report = run_simulation(
            &mut clock,
            &mut city,
            &mut registry,
            &controls,
            &mut callback,
        )
        .await
        .unwrap();
        assert_eq!(report.end_reason, SimulationEndReason::DaysCompleted);
        // A one-day hourly clock emits 23 ticks; the rollover is withheld.
        assert_eq!(report.ticks, 23);
        assert!(clock.is_finished());
    }

    #[tokio::test]
    async fn operator_stop_ends_the_run_early() {
        let mut clock = SimClock::new(3600, 1000).unwrap();
        let mut city = empty_city();
        let mut registry = ObserverRegistry::standard();
        let controls = OperatorControls::new(1).unwrap();
        controls.request_stop();
        let mut callback = NoOpCallback;

        let report = run_simulation(
            &mut clock,
            &mut city,
            &mut registry,
            &controls,
            &mut callback,
        )
        .await
        .unwrap();
        assert_eq!(report.end_reason, SimulationEndReason::OperatorStop);
        assert_eq!(report.ticks, 0);
        assert!(!clock.is_finished());
    }

    #[tokio::test]
    async fn paused_run_resumes_without_losing_time() {
        let mut clock = SimClock::new(3600, 1).unwrap();
        let mut city = empty_city();
        let mut registry = ObserverRegistry::standard();
        let controls = Arc::new(OperatorControls::new(1).unwrap());
        controls.pause();

        let remote = Arc::clone(&controls);
        let resumer = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            remote.resume();
        });

        let mut callback = NoOpCallback;
        let report = run_simulation(
            &mut clock,
            &mut city,
            &mut registry,
            &controls,
            &mut callback,
        )
        .await
        .unwrap();
        resumer.await.unwrap();

        // Pausing suppressed emission but lost no ticks.
        assert_eq!(report.end_reason, SimulationEndReason::DaysCompleted);
        assert_eq!(report.ticks, 23);
    }

    /// A callback that counts invocations.
    struct CountingCallback(u64);

    impl TickCallback for CountingCallback {
        fn on_tick(&mut self, _summary: &TickSummary, _city: &CityState) {
            self.0 = self.0.saturating_add(1);
        }
    }

    #[tokio::test]
    async fn callback_fires_once_per_tick() {
        let mut clock = SimClock::new(3600, 1).unwrap();
        let mut city = empty_city();
        let mut registry = ObserverRegistry::standard();
        let controls = OperatorControls::new(1).unwrap();
        let mut callback = CountingCallback(0);

        let report = run_simulation(
            &mut clock,
            &mut city,
            &mut registry,
            &controls,
            &mut callback,
        )
        .await
        .unwrap();
        assert_eq!(callback.0, report.ticks);
    }
}
