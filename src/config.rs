//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from
/// TOML with [`GridConfig::from_toml_file`] or use
/// [`GridConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridConfig {
    /// Global simulation parameters.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Shared energy pool parameters.
    #[serde(default)]
    pub pool: PoolConfig,
    /// Household population and consumption profile.
    #[serde(default)]
    pub households: HouseholdsConfig,
    /// Station population and production profile.
    #[serde(default)]
    pub stations: StationsConfig,
    /// Renewable sources registered when the grid is built.
    #[serde(default)]
    pub renewables: Vec<RenewableConfig>,
}

/// Global simulation parameters.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Master random seed. When absent every actor is seeded from the OS.
    pub seed: Option<u64>,
}

/// Shared energy pool parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoolConfig {
    /// Capacity the pool starts with; both `available` and `total`.
    pub initial_capacity: u32,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 50,
        }
    }
}

/// Household population and consumption profile.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HouseholdsConfig {
    /// Number of household actors spawned per run.
    pub count: usize,
    /// Smallest amount drawn per cycle (inclusive).
    pub consumption_min: u32,
    /// Largest amount drawn per cycle (inclusive).
    pub consumption_max: u32,
    /// Shortest hold in milliseconds (inclusive).
    pub hold_ms_min: u64,
    /// Longest hold in milliseconds (exclusive).
    pub hold_ms_max: u64,
}

impl Default for HouseholdsConfig {
    fn default() -> Self {
        Self {
            count: 5,
            consumption_min: 2,
            consumption_max: 5,
            hold_ms_min: 400,
            hold_ms_max: 600,
        }
    }
}

/// Station population and production profile.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StationsConfig {
    /// Number of station actors spawned per run.
    pub count: usize,
    /// Smallest amount produced per cycle (inclusive).
    pub production_min: u32,
    /// Largest amount produced per cycle (inclusive).
    pub production_max: u32,
    /// Shortest pause between cycles in milliseconds (inclusive).
    pub interval_ms_min: u64,
    /// Longest pause between cycles in milliseconds (exclusive).
    pub interval_ms_max: u64,
}

impl Default for StationsConfig {
    fn default() -> Self {
        Self {
            count: 2,
            production_min: 5,
            production_max: 9,
            interval_ms_min: 1000,
            interval_ms_max: 1500,
        }
    }
}

/// A renewable source registered at startup.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenewableConfig {
    /// Free-form source kind, e.g. `"solar"`.
    pub kind: String,
    /// Permanent capacity granted to the pool (must be > 0).
    pub capacity: i64,
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"households.count"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl GridConfig {
    /// Returns the baseline scenario: 50 units, 5 households, 2 stations.
    pub fn baseline() -> Self {
        Self::default()
    }

    /// Returns the scarce preset: a small pool, hungry households, one station.
    pub fn scarce() -> Self {
        Self {
            pool: PoolConfig {
                initial_capacity: 10,
            },
            households: HouseholdsConfig {
                count: 8,
                consumption_min: 4,
                consumption_max: 8,
                ..HouseholdsConfig::default()
            },
            stations: StationsConfig {
                count: 1,
                production_min: 2,
                production_max: 4,
                ..StationsConfig::default()
            },
            ..Self::default()
        }
    }

    /// Returns the surplus preset: large pool, extra stations, a solar farm.
    pub fn surplus() -> Self {
        Self {
            pool: PoolConfig {
                initial_capacity: 200,
            },
            stations: StationsConfig {
                count: 4,
                ..StationsConfig::default()
            },
            renewables: vec![RenewableConfig {
                kind: "solar".to_string(),
                capacity: 40,
            }],
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "scarce", "surplus"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "scarce" => Ok(Self::scarce()),
            "surplus" => Ok(Self::surplus()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let h = &self.households;
        if h.count == 0 {
            errors.push(ConfigError {
                field: "households.count".into(),
                message: "must be > 0".into(),
            });
        }
        if h.consumption_min == 0 {
            errors.push(ConfigError {
                field: "households.consumption_min".into(),
                message: "must be > 0".into(),
            });
        }
        if h.consumption_min > h.consumption_max {
            errors.push(ConfigError {
                field: "households.consumption_min".into(),
                message: "must be <= households.consumption_max".into(),
            });
        }
        if h.hold_ms_min >= h.hold_ms_max {
            errors.push(ConfigError {
                field: "households.hold_ms_min".into(),
                message: "must be < households.hold_ms_max".into(),
            });
        }

        let s = &self.stations;
        if s.count == 0 {
            errors.push(ConfigError {
                field: "stations.count".into(),
                message: "must be > 0".into(),
            });
        }
        if s.production_min == 0 {
            errors.push(ConfigError {
                field: "stations.production_min".into(),
                message: "must be > 0".into(),
            });
        }
        if s.production_min > s.production_max {
            errors.push(ConfigError {
                field: "stations.production_min".into(),
                message: "must be <= stations.production_max".into(),
            });
        }
        if s.interval_ms_min >= s.interval_ms_max {
            errors.push(ConfigError {
                field: "stations.interval_ms_min".into(),
                message: "must be < stations.interval_ms_max".into(),
            });
        }

        for (i, r) in self.renewables.iter().enumerate() {
            if r.kind.trim().is_empty() {
                errors.push(ConfigError {
                    field: format!("renewables[{i}].kind"),
                    message: "must not be empty".into(),
                });
            }
            if r.capacity <= 0 || r.capacity > i64::from(u32::MAX) {
                errors.push(ConfigError {
                    field: format!("renewables[{i}].capacity"),
                    message: format!("must be between 1 and {}", u32::MAX),
                });
            }
        }

        errors
    }
}
