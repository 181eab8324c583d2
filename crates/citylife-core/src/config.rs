//! Configuration loading and typed config structures.
//!
//! The canonical configuration lives in `citylife-config.yaml` at the
//! project root. This module defines strongly-typed structs that mirror
//! the YAML structure and provides a loader that reads the file. Zone
//! and transport definitions are supplied here as pre-parsed lists; the
//! core never parses any other file format.

use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `citylife-config.yaml`. All fields have
/// defaults describing a three-zone demo city.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationConfig {
    /// Clock and pacing settings.
    #[serde(default)]
    pub simulation: RunConfig,

    /// Population parameters.
    #[serde(default)]
    pub population: PopulationConfig,

    /// Zone definitions.
    #[serde(default = "default_zones")]
    pub zones: Vec<ZoneDef>,

    /// Transport line definitions.
    #[serde(default = "default_transport")]
    pub transport: Vec<TransportDef>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            simulation: RunConfig::default(),
            population: PopulationConfig::default(),
            zones: default_zones(),
            transport: default_transport(),
        }
    }
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_yml::from_str(&contents)?;
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }
}

/// Clock and pacing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunConfig {
    /// Simulated seconds added per tick. Must divide one day exactly.
    #[serde(default = "default_seconds_per_tick")]
    pub seconds_per_tick: u32,

    /// Run length in simulated days.
    #[serde(default = "default_total_days")]
    pub total_days: u32,

    /// Real-time milliseconds per tick (runtime-adjustable).
    #[serde(default = "default_update_rate_ms")]
    pub update_rate_ms: u64,

    /// Random seed for reproducibility.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seconds_per_tick: default_seconds_per_tick(),
            total_days: default_total_days(),
            update_rate_ms: default_update_rate_ms(),
            seed: default_seed(),
        }
    }
}

/// Population configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PopulationConfig {
    /// Number of persons to spawn at simulation start.
    #[serde(default = "default_people")]
    pub people: u32,

    /// Residents per business: total business count is
    /// `people / residents_per_business`, at least one.
    #[serde(default = "default_residents_per_business")]
    pub residents_per_business: u32,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            people: default_people(),
            residents_per_business: default_residents_per_business(),
        }
    }
}

/// A zone definition, pre-parsed for the spawner.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ZoneDef {
    /// Unique zone name.
    pub name: String,
    /// Left edge of the boundary.
    pub x: i32,
    /// Top edge of the boundary.
    pub y: i32,
    /// Boundary width in map units.
    pub width: u32,
    /// Boundary height in map units.
    pub height: u32,
    /// Share of the city's businesses hosted here, in percent.
    pub business_share: u8,
    /// Minimum welfare starting balance for residents.
    pub welfare_min: u64,
    /// Maximum welfare starting balance for residents.
    pub welfare_max: u64,
}

/// A transport line definition, pre-parsed for the spawner.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TransportDef {
    /// Line name.
    pub name: String,
    /// Name of one endpoint zone.
    pub from: String,
    /// Name of the other endpoint zone.
    pub to: String,
    /// Passenger capacity (congestion threshold).
    pub capacity: u32,
    /// Base trip duration in minutes.
    pub duration_minutes: u32,
}

const fn default_seconds_per_tick() -> u32 {
    60
}

const fn default_total_days() -> u32 {
    7
}

const fn default_update_rate_ms() -> u64 {
    100
}

const fn default_seed() -> u64 {
    42
}

const fn default_people() -> u32 {
    100
}

const fn default_residents_per_business() -> u32 {
    10
}

fn default_zones() -> Vec<ZoneDef> {
    vec![
        ZoneDef {
            name: "Centro".to_owned(),
            x: 0,
            y: 0,
            width: 300,
            height: 300,
            business_share: 50,
            welfare_min: 1_000,
            welfare_max: 2_000,
        },
        ZoneDef {
            name: "Residencial".to_owned(),
            x: 400,
            y: 0,
            width: 300,
            height: 300,
            business_share: 20,
            welfare_min: 500,
            welfare_max: 1_500,
        },
        ZoneDef {
            name: "Industrial".to_owned(),
            x: 0,
            y: 400,
            width: 300,
            height: 300,
            business_share: 30,
            welfare_min: 300,
            welfare_max: 1_000,
        },
    ]
}

fn default_transport() -> Vec<TransportDef> {
    vec![
        TransportDef {
            name: "Line 1".to_owned(),
            from: "Centro".to_owned(),
            to: "Residencial".to_owned(),
            capacity: 30,
            duration_minutes: 20,
        },
        TransportDef {
            name: "Line 2".to_owned(),
            from: "Centro".to_owned(),
            to: "Industrial".to_owned(),
            capacity: 25,
            duration_minutes: 30,
        },
        TransportDef {
            name: "Line 3".to_owned(),
            from: "Residencial".to_owned(),
            to: "Industrial".to_owned(),
            capacity: 20,
            duration_minutes: 45,
        },
    ]
}
