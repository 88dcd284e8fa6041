//! Shared energy pool: a fair, growable counting resource.

use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

/// Errors returned by [`EnergyPool::acquire`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PoolError {
    /// The caller's run was cancelled while it waited for capacity.
    #[error("acquire of {requested} units cancelled while waiting for capacity")]
    Cancelled {
        /// Amount that was being waited for.
        requested: u32,
    },
}

/// Bounded energy pool shared by every actor of a grid.
///
/// `available` is the unborrowed capacity, `total` the cumulative capacity
/// ever granted. The only mutators are [`acquire`](Self::acquire),
/// [`release`](Self::release) and [`add_capacity`](Self::add_capacity),
/// which keep `0 <= available <= total` at every observable instant:
/// capacity growth raises `total` before it raises `available`, and
/// releases only return what an earlier acquire took.
///
/// Waiters are served first-requested, first-served by a fair semaphore. A
/// large request at the head of the queue holds back smaller requests
/// behind it until it is satisfied or cancelled. Units the semaphore has
/// set aside for an unfinished request still count as available; only a
/// completed acquire lowers `available`.
///
/// # Examples
///
/// ```
/// use microgrid_sim::sim::pool::EnergyPool;
///
/// let pool = EnergyPool::new(50);
/// pool.add_capacity(20);
/// assert_eq!(pool.snapshot(), (70, 70));
/// ```
#[derive(Debug)]
pub struct EnergyPool {
    permits: Semaphore,
    available: AtomicU64,
    total: AtomicU64,
}

impl EnergyPool {
    /// Creates a pool whose `available` and `total` both equal `initial`.
    pub fn new(initial: u32) -> Self {
        Self {
            permits: Semaphore::new(initial as usize),
            available: AtomicU64::new(u64::from(initial)),
            total: AtomicU64::new(u64::from(initial)),
        }
    }

    /// Waits until `amount` units are available and takes them.
    ///
    /// Never grants a partial amount. If `cancel` fires first, any units
    /// provisionally reserved for this request go back to the pool and the
    /// request leaves the wait queue.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Cancelled`] when `cancel` fires before the
    /// request is satisfied.
    pub async fn acquire(&self, amount: u32, cancel: &CancellationToken) -> Result<(), PoolError> {
        let cancelled = PoolError::Cancelled { requested: amount };
        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(cancelled),
            permit = self.permits.acquire_many(amount) => {
                // The semaphore is never closed.
                permit.map_err(|_| cancelled)?.forget();
                self.available.fetch_sub(u64::from(amount), Ordering::SeqCst);
                Ok(())
            }
        }
    }

    /// Returns previously acquired units to the pool. Never blocks.
    ///
    /// Must only be called with an amount taken by an earlier
    /// [`acquire`](Self::acquire).
    pub fn release(&self, amount: u32) {
        debug_assert!(
            self.available() + u64::from(amount) <= self.total(),
            "release of {amount} would push available above total"
        );
        self.available.fetch_add(u64::from(amount), Ordering::SeqCst);
        self.permits.add_permits(amount as usize);
    }

    /// Permanently grows the pool: raises `total`, then `available`, by `amount`.
    pub fn add_capacity(&self, amount: u32) {
        self.total.fetch_add(u64::from(amount), Ordering::SeqCst);
        self.available.fetch_add(u64::from(amount), Ordering::SeqCst);
        self.permits.add_permits(amount as usize);
    }

    /// Currently unborrowed capacity, including units set aside for a
    /// request that is still waiting.
    pub fn available(&self) -> u64 {
        self.available.load(Ordering::SeqCst)
    }

    /// Cumulative capacity ever granted to the pool.
    pub fn total(&self) -> u64 {
        self.total.load(Ordering::SeqCst)
    }

    /// Reads `(available, total)`.
    ///
    /// `available` is read first; since `total` never decreases and always
    /// grows before `available` does, the pair satisfies `available <= total`.
    pub fn snapshot(&self) -> (u64, u64) {
        let available = self.available();
        let total = self.total();
        (available, total)
    }
}
