//! Simulation manager owning the pool, the registry and the actor population.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock};
use rand::rngs::StdRng;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::GridConfig;
use crate::devices::types::actor_rng;
use crate::devices::{Actor, ActorContext, ConsumptionProfile, Household, ProductionProfile, Station};
use crate::error::GridError;

use super::pool::EnergyPool;
use super::registry::{RenewableRegistry, RenewableSource};
use super::types::{GridSnapshot, HouseholdReading};

/// Seed offset for station RNGs to avoid correlation with households.
const STATION_SEED_OFFSET: u64 = 1_000;

/// Seed stride between consecutive runs so a restart draws fresh values.
const RUN_SEED_STRIDE: u64 = 1_000_003;

/// Handles of the actors spawned by one `start`.
struct ActiveRun {
    cancel: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

/// Owns the grid and its actors.
///
/// The manager is the only component that replaces the actor population.
/// All operations are callable from any thread; none of them waits on an
/// actor. Actors are spawned on the tokio runtime given at construction.
pub struct SimulationManager {
    config: GridConfig,
    runtime: Handle,
    pool: Arc<EnergyPool>,
    registry: RenewableRegistry,
    households: RwLock<Vec<Arc<Household>>>,
    stations: RwLock<Vec<Arc<Station>>>,
    run: Mutex<Option<ActiveRun>>,
    runs_started: AtomicU64,
}

impl SimulationManager {
    /// Builds a grid from a scenario without starting any actor.
    ///
    /// The pool starts at `pool.initial_capacity` and every renewable listed
    /// in the scenario is registered right away.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidScenario`] when the scenario fails
    /// validation.
    pub fn new(config: GridConfig, runtime: Handle) -> Result<Self, GridError> {
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(GridError::InvalidScenario(errors));
        }

        let pool = Arc::new(EnergyPool::new(config.pool.initial_capacity));
        let registry = RenewableRegistry::new(Arc::clone(&pool));
        for r in &config.renewables {
            registry.register(r.kind.clone(), r.capacity)?;
        }

        Ok(Self {
            config,
            runtime,
            pool,
            registry,
            households: RwLock::new(Vec::new()),
            stations: RwLock::new(Vec::new()),
            run: Mutex::new(None),
            runs_started: AtomicU64::new(0),
        })
    }

    /// Starts the simulation unless it is already running.
    ///
    /// Replaces the previous population with `households.count` households
    /// and `stations.count` stations and returns right after spawning them.
    /// Returns `false` (and changes nothing) when a run is already active.
    pub fn start(&self) -> bool {
        let mut run = self.run.lock();
        if run.is_some() {
            debug!("simulation already running, start ignored");
            return false;
        }

        let generation = self.runs_started.fetch_add(1, Ordering::Relaxed) + 1;
        let seed = self
            .config
            .simulation
            .seed
            .map(|s| s.wrapping_add(generation.wrapping_mul(RUN_SEED_STRIDE)));
        let cancel = CancellationToken::new();

        let consumption = ConsumptionProfile::from(&self.config.households);
        let households: Vec<Arc<Household>> = (1..=self.config.households.count)
            .map(|i| Arc::new(Household::new(format!("H{i}"), consumption.clone())))
            .collect();

        let production = ProductionProfile::from(&self.config.stations);
        let stations: Vec<Arc<Station>> = (1..=self.config.stations.count)
            .map(|i| Arc::new(Station::new(format!("S{i}"), production.clone())))
            .collect();

        let mut tasks = Vec::with_capacity(households.len() + stations.len());
        for (i, station) in stations.iter().enumerate() {
            let rng = actor_rng(seed, STATION_SEED_OFFSET + i as u64);
            tasks.push(self.spawn_actor(Arc::clone(station), rng, &cancel));
        }
        for (i, household) in households.iter().enumerate() {
            let rng = actor_rng(seed, i as u64);
            tasks.push(self.spawn_actor(Arc::clone(household), rng, &cancel));
        }

        *self.stations.write() = stations;
        *self.households.write() = households;
        *run = Some(ActiveRun { cancel, tasks });

        info!(
            run = generation,
            households = self.config.households.count,
            stations = self.config.stations.count,
            "simulation started"
        );
        true
    }

    fn spawn_actor<A: Actor>(
        &self,
        actor: Arc<A>,
        rng: StdRng,
        cancel: &CancellationToken,
    ) -> JoinHandle<()> {
        debug!(actor = actor.id(), kind = actor.actor_type(), "spawning actor");
        let ctx = ActorContext::new(Arc::clone(&self.pool), rng, cancel.clone());
        self.runtime.spawn(actor.run(ctx))
    }

    /// Stops the active run and waits for every actor to finish.
    ///
    /// Households holding energy return it before they exit. The last
    /// population stays visible in snapshots until the next `start`.
    pub async fn shutdown(&self) {
        let run = self.run.lock().take();
        let Some(run) = run else {
            return;
        };
        run.cancel.cancel();
        for task in run.tasks {
            if let Err(e) = task.await {
                warn!(error = %e, "actor task did not finish cleanly");
            }
        }
        info!("simulation stopped");
    }

    /// Registers a renewable source; legal at any time.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidCapacity`] for capacities outside
    /// `1..=u32::MAX`.
    pub fn add_renewable(&self, kind: &str, capacity: i64) -> Result<RenewableSource, GridError> {
        self.registry.register(kind, capacity)
    }

    /// Reads the grid without pausing it.
    pub fn snapshot(&self) -> GridSnapshot {
        let ((available, total), renewables) = self
            .registry
            .with_sources(|sources| (self.pool.snapshot(), sources.to_vec()));
        let households = self
            .households
            .read()
            .iter()
            .map(|h| HouseholdReading {
                id: h.id().to_string(),
                consumption: h.last_consumption(),
            })
            .collect();

        GridSnapshot {
            total,
            available,
            households,
            renewables,
        }
    }

    /// Returns `true` between a successful `start` and `shutdown`.
    pub fn is_running(&self) -> bool {
        self.run.lock().is_some()
    }

    /// Number of households in the current (or last) population.
    pub fn household_count(&self) -> usize {
        self.households.read().len()
    }

    /// Number of stations in the current (or last) population.
    pub fn station_count(&self) -> usize {
        self.stations.read().len()
    }

    /// Units currently borrowed by households.
    ///
    /// While every actor is parked, `available + held_energy() == total`.
    pub fn held_energy(&self) -> u64 {
        self.households.read().iter().map(|h| u64::from(h.held())).sum()
    }

    /// Completed borrow/return cycles of the current (or last) population.
    pub fn household_cycles(&self) -> u64 {
        self.households.read().iter().map(|h| h.cycles()).sum()
    }

    /// Total units injected by the current (or last) station population.
    pub fn station_output(&self) -> u64 {
        self.stations.read().iter().map(|s| s.produced()).sum()
    }

    /// The shared energy pool.
    pub fn pool(&self) -> &Arc<EnergyPool> {
        &self.pool
    }

    /// The renewable registry.
    pub fn registry(&self) -> &RenewableRegistry {
        &self.registry
    }

    /// The scenario this grid was built from.
    pub fn config(&self) -> &GridConfig {
        &self.config
    }
}

impl Drop for SimulationManager {
    fn drop(&mut self) {
        if let Some(run) = self.run.get_mut().take() {
            run.cancel.cancel();
        }
    }
}
