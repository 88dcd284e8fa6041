/// Simulation manager: lifecycle and snapshots.
pub mod manager;
/// Shared energy pool.
pub mod pool;
/// Periodic snapshot sampling.
pub mod recorder;
pub mod registry;
pub mod types;

pub use manager::SimulationManager;
pub use pool::{EnergyPool, PoolError};
pub use registry::{RenewableRegistry, RenewableSource};
pub use types::{GridSnapshot, HouseholdReading};
