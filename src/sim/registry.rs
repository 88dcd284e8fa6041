//! Append-only registry of renewable sources.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use tracing::info;

use crate::error::GridError;
use crate::sim::pool::EnergyPool;

/// A registered renewable source. Immutable once inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenewableSource {
    /// Free-form kind, e.g. `"solar"`.
    #[serde(rename = "tipo")]
    pub kind: String,
    /// Permanent capacity granted to the pool.
    #[serde(rename = "capacidad")]
    pub capacity: u32,
}

/// Renewable sources in registration order, each backed by pool capacity.
///
/// Registration appends the entry and grows the pool inside one write
/// critical section, so readers going through [`with_sources`](Self::with_sources)
/// never see an entry without its capacity or the other way round.
#[derive(Debug)]
pub struct RenewableRegistry {
    pool: Arc<EnergyPool>,
    sources: RwLock<Vec<RenewableSource>>,
}

impl RenewableRegistry {
    /// Creates an empty registry feeding `pool`.
    pub fn new(pool: Arc<EnergyPool>) -> Self {
        Self {
            pool,
            sources: RwLock::new(Vec::new()),
        }
    }

    /// Registers a source and grants its capacity to the pool.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidKind`] for a blank `kind` and
    /// [`GridError::InvalidCapacity`] when `capacity` is not in
    /// `1..=u32::MAX`; in both cases neither the registry nor the pool
    /// changes.
    pub fn register(&self, kind: impl Into<String>, capacity: i64) -> Result<RenewableSource, GridError> {
        let kind = kind.into();
        if kind.trim().is_empty() {
            return Err(GridError::InvalidKind { kind });
        }
        let Some(granted) = u32::try_from(capacity).ok().filter(|c| *c > 0) else {
            return Err(GridError::InvalidCapacity { kind, capacity });
        };

        let source = RenewableSource {
            kind,
            capacity: granted,
        };
        {
            let mut sources = self.sources.write();
            sources.push(source.clone());
            self.pool.add_capacity(granted);
        }
        info!(kind = %source.kind, capacity = granted, "renewable source registered");
        Ok(source)
    }

    /// Returns all sources in registration order.
    pub fn list(&self) -> Vec<RenewableSource> {
        self.sources.read().clone()
    }

    /// Runs `f` over the sources while registrations are held off.
    pub fn with_sources<R>(&self, f: impl FnOnce(&[RenewableSource]) -> R) -> R {
        f(&self.sources.read())
    }

    /// Number of registered sources.
    pub fn len(&self) -> usize {
        self.sources.read().len()
    }

    /// Returns `true` when nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

}
