//! Common types and traits for grid actors.

use std::future::Future;
use std::ops::{Range, RangeInclusive};
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio_util::sync::CancellationToken;

use crate::config::{HouseholdsConfig, StationsConfig};
use crate::sim::pool::EnergyPool;

/// Everything an actor needs for one run.
///
/// # Fields
/// * `pool` - Shared energy pool
/// * `rng` - Actor-local random number generator
/// * `cancel` - Stop signal for the run; checked at every suspension point
pub struct ActorContext {
    pub pool: Arc<EnergyPool>,
    pub rng: StdRng,
    pub cancel: CancellationToken,
}

impl ActorContext {
    /// Creates a new context for a single actor.
    pub fn new(pool: Arc<EnergyPool>, rng: StdRng, cancel: CancellationToken) -> Self {
        Self { pool, rng, cancel }
    }
}

/// A long-lived participant of the grid.
///
/// Each actor runs as its own task until its context's cancellation token
/// fires. Implementations must return promptly after cancellation and must
/// leave the pool as they found it, apart from permanent capacity growth.
pub trait Actor: Send + Sync + 'static {
    /// Stable identifier, e.g. `"H1"`.
    fn id(&self) -> &str;

    /// Returns a human-readable type name for the actor.
    fn actor_type(&self) -> &'static str;

    /// Runs the actor loop until cancelled.
    fn run(self: Arc<Self>, ctx: ActorContext) -> impl Future<Output = ()> + Send + 'static;
}

/// How much a household draws and for how long it holds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumptionProfile {
    /// Units drawn per cycle.
    pub amount: RangeInclusive<u32>,
    /// Hold duration in milliseconds.
    pub hold_ms: Range<u64>,
}

impl ConsumptionProfile {
    /// Draws the amount for the next cycle.
    pub fn sample_amount(&self, rng: &mut StdRng) -> u32 {
        rng.random_range(self.amount.clone())
    }

    /// Draws the hold duration for the next cycle.
    pub fn sample_hold(&self, rng: &mut StdRng) -> Duration {
        Duration::from_millis(rng.random_range(self.hold_ms.clone()))
    }
}

impl Default for ConsumptionProfile {
    fn default() -> Self {
        Self::from(&HouseholdsConfig::default())
    }
}

impl From<&HouseholdsConfig> for ConsumptionProfile {
    fn from(cfg: &HouseholdsConfig) -> Self {
        Self {
            amount: cfg.consumption_min..=cfg.consumption_max,
            hold_ms: cfg.hold_ms_min..cfg.hold_ms_max,
        }
    }
}

/// How much a station produces and how long it rests between cycles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductionProfile {
    /// Units produced per cycle.
    pub amount: RangeInclusive<u32>,
    /// Pause between cycles in milliseconds.
    pub interval_ms: Range<u64>,
}

impl ProductionProfile {
    /// Draws the amount for the next cycle.
    pub fn sample_amount(&self, rng: &mut StdRng) -> u32 {
        rng.random_range(self.amount.clone())
    }

    /// Draws the pause before the next cycle.
    pub fn sample_interval(&self, rng: &mut StdRng) -> Duration {
        Duration::from_millis(rng.random_range(self.interval_ms.clone()))
    }
}

impl Default for ProductionProfile {
    fn default() -> Self {
        Self::from(&StationsConfig::default())
    }
}

impl From<&StationsConfig> for ProductionProfile {
    fn from(cfg: &StationsConfig) -> Self {
        Self {
            amount: cfg.production_min..=cfg.production_max,
            interval_ms: cfg.interval_ms_min..cfg.interval_ms_max,
        }
    }
}

/// Builds an actor RNG.
///
/// With a master seed the actor gets `seed + offset` so actors never share
/// a stream; without one it is seeded from the OS.
pub fn actor_rng(seed: Option<u64>, offset: u64) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(offset)),
        None => StdRng::from_os_rng(),
    }
}
