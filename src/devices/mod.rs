//! Grid actors: the consumers and producers sharing the energy pool.

/// Consumer actor borrowing capacity from the pool.
pub mod household;
/// Producer actor permanently growing the pool.
pub mod station;
pub mod types;

// Re-export the main types for convenience
pub use household::Household;
pub use station::Station;
pub use types::Actor;
pub use types::ActorContext;
pub use types::{ConsumptionProfile, ProductionProfile};
