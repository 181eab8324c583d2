//! CityLife simulation binary.
//!
//! This is the main entry point that wires together the clock, the
//! spawned city, the observer passes, and the operator controls. It
//! loads configuration, builds everything, and runs the tick loop until
//! the configured number of days has elapsed.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `citylife-config.yaml`
//! 3. Create the simulation clock
//! 4. Spawn the city (zones, lines, businesses, persons)
//! 5. Register the person and business observer passes
//! 6. Create operator controls
//! 7. Run the simulation loop
//! 8. Log the result

mod callback;
mod error;
mod spawner;

use std::path::Path;
use std::sync::Arc;

use citylife_core::{ObserverRegistry, OperatorControls, SimClock, SimulationConfig, run_simulation};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::callback::SnapshotCallback;
use crate::error::EngineError;

/// Default configuration file path, relative to the working directory.
const CONFIG_PATH: &str = "citylife-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if any initialization step or the simulation itself
/// fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("citylife-engine starting");

    // 2. Load configuration, falling back to defaults if no file exists.
    let config = load_config(Path::new(CONFIG_PATH))?;
    info!(
        seconds_per_tick = config.simulation.seconds_per_tick,
        total_days = config.simulation.total_days,
        update_rate_ms = config.simulation.update_rate_ms,
        seed = config.simulation.seed,
        people = config.population.people,
        "configuration loaded"
    );

    // 3. Create the simulation clock.
    let mut clock = SimClock::new(
        config.simulation.seconds_per_tick,
        config.simulation.total_days,
    )
    .map_err(EngineError::from)?;
    info!("clock initialized");

    // 4. Spawn the city.
    let mut city = spawner::spawn_city(&config)?;

    // 5. Register observers: persons strictly before businesses.
    let mut registry = ObserverRegistry::standard();

    // 6. Operator controls (shared with any external control surface).
    let controls = Arc::new(
        OperatorControls::new(config.simulation.update_rate_ms).map_err(EngineError::from)?,
    );

    // 7. Run the simulation loop.
    let mut callback = SnapshotCallback::new();
    let snapshot_handle = callback.handle();
    let report = run_simulation(
        &mut clock,
        &mut city,
        &mut registry,
        &controls,
        &mut callback,
    )
    .await
    .map_err(EngineError::from)?;

    // 8. Log the result.
    info!(
        end_reason = ?report.end_reason,
        ticks = report.ticks,
        days = report.days,
        "simulation finished"
    );
    if let Ok(slot) = snapshot_handle.read()
        && let Some(snapshot) = slot.as_ref()
    {
        info!(
            employed = snapshot.summary.employed,
            unemployed = snapshot.summary.unemployed,
            total_money = snapshot.summary.total_money,
            "final city state"
        );
    }
    Ok(())
}

/// Load the YAML configuration, or defaults when the file is absent.
fn load_config(path: &Path) -> Result<SimulationConfig, EngineError> {
    if path.exists() {
        Ok(SimulationConfig::from_file(path)?)
    } else {
        info!(path = %path.display(), "no config file found; using defaults");
        Ok(SimulationConfig::default())
    }
}
