use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use tracing::debug;

use super::types::{Actor, ActorContext, ConsumptionProfile};

/// A consumer that repeatedly borrows energy from the pool.
///
/// Every cycle the household draws a random amount, waits for the pool to
/// grant it, holds it for a random dwell time and returns it. Waiting for
/// capacity is the only point where a household contends with others.
///
/// # Examples
///
/// ```
/// use microgrid_sim::devices::Household;
///
/// let house = Household::new("H1", Default::default());
/// assert_eq!(house.id(), "H1");
/// assert_eq!(house.last_consumption(), 0);
/// ```
#[derive(Debug)]
pub struct Household {
    id: String,
    profile: ConsumptionProfile,
    last_consumption: AtomicU32,
    held: AtomicU32,
    cycles: AtomicU64,
}

impl Household {
    /// Creates a household that has not consumed anything yet.
    pub fn new(id: impl Into<String>, profile: ConsumptionProfile) -> Self {
        Self {
            id: id.into(),
            profile,
            last_consumption: AtomicU32::new(0),
            held: AtomicU32::new(0),
            cycles: AtomicU64::new(0),
        }
    }

    /// Identifier, e.g. `"H3"`.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Amount granted in the most recent cycle, 0 before the first grant.
    pub fn last_consumption(&self) -> u32 {
        self.last_consumption.load(Ordering::Relaxed)
    }

    /// Amount currently borrowed from the pool; 0 while waiting.
    pub fn held(&self) -> u32 {
        self.held.load(Ordering::SeqCst)
    }

    /// Number of completed acquire/release cycles.
    pub fn cycles(&self) -> u64 {
        self.cycles.load(Ordering::Relaxed)
    }
}

impl Actor for Household {
    fn id(&self) -> &str {
        &self.id
    }

    fn actor_type(&self) -> &'static str {
        "household"
    }

    async fn run(self: Arc<Self>, mut ctx: ActorContext) {
        loop {
            let amount = self.profile.sample_amount(&mut ctx.rng);
            if let Err(e) = ctx.pool.acquire(amount, &ctx.cancel).await {
                debug!(household = %self.id, error = %e, "household stopped while waiting");
                return;
            }
            self.held.store(amount, Ordering::SeqCst);
            self.last_consumption.store(amount, Ordering::Relaxed);

            let hold = self.profile.sample_hold(&mut ctx.rng);
            let interrupted = tokio::select! {
                () = ctx.cancel.cancelled() => true,
                () = tokio::time::sleep(hold) => false,
            };

            // Whatever was borrowed goes back exactly once, even when the
            // hold was cut short.
            self.held.store(0, Ordering::SeqCst);
            ctx.pool.release(amount);
            self.cycles.fetch_add(1, Ordering::Relaxed);

            if interrupted {
                debug!(household = %self.id, amount, "household stopped during hold");
                return;
            }
            debug!(household = %self.id, amount, hold_ms = hold.as_millis() as u64, "consumption cycle");
        }
    }
}
