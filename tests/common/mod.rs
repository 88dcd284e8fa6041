//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use tokio::runtime::Handle;

use microgrid_sim::config::GridConfig;
use microgrid_sim::sim::SimulationManager;

/// Baseline scenario (50 units, 5 households, 2 stations) with seed 42.
pub fn seeded_config() -> GridConfig {
    let mut cfg = GridConfig::baseline();
    cfg.simulation.seed = Some(42);
    cfg
}

/// Baseline population with millisecond-scale timings for stress runs.
pub fn fast_config() -> GridConfig {
    let mut cfg = seeded_config();
    cfg.households.hold_ms_min = 1;
    cfg.households.hold_ms_max = 3;
    cfg.stations.interval_ms_min = 2;
    cfg.stations.interval_ms_max = 5;
    cfg
}

/// Scarce population: households routinely wait on each other.
pub fn contended_config() -> GridConfig {
    let mut cfg = GridConfig::scarce();
    cfg.simulation.seed = Some(7);
    cfg.households.hold_ms_min = 1;
    cfg.households.hold_ms_max = 4;
    cfg.stations.interval_ms_min = 5;
    cfg.stations.interval_ms_max = 10;
    cfg
}

/// Builds a manager on the current tokio runtime.
pub fn build_manager(cfg: GridConfig) -> Arc<SimulationManager> {
    Arc::new(SimulationManager::new(cfg, Handle::current()).expect("valid scenario"))
}
