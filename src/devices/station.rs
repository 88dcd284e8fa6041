use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use super::types::{Actor, ActorContext, ProductionProfile};

/// A producer that permanently grows the pool's capacity.
///
/// Unlike a household's borrow, every unit a station injects raises both
/// `available` and `total` for good.
#[derive(Debug)]
pub struct Station {
    id: String,
    profile: ProductionProfile,
    produced: AtomicU64,
}

impl Station {
    /// Creates an idle station.
    pub fn new(id: impl Into<String>, profile: ProductionProfile) -> Self {
        Self {
            id: id.into(),
            profile,
            produced: AtomicU64::new(0),
        }
    }

    /// Identifier, e.g. `"S1"`.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Total units injected so far.
    pub fn produced(&self) -> u64 {
        self.produced.load(Ordering::Relaxed)
    }
}

impl Actor for Station {
    fn id(&self) -> &str {
        &self.id
    }

    fn actor_type(&self) -> &'static str {
        "station"
    }

    async fn run(self: Arc<Self>, mut ctx: ActorContext) {
        while !ctx.cancel.is_cancelled() {
            let amount = self.profile.sample_amount(&mut ctx.rng);
            ctx.pool.add_capacity(amount);
            self.produced.fetch_add(u64::from(amount), Ordering::Relaxed);

            let pause = self.profile.sample_interval(&mut ctx.rng);
            debug!(station = %self.id, amount, pause_ms = pause.as_millis() as u64, "production cycle");
            tokio::select! {
                () = ctx.cancel.cancelled() => break,
                () = tokio::time::sleep(pause) => {}
            }
        }
        debug!(station = %self.id, produced = self.produced(), "station stopped");
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::devices::types::actor_rng;
    use crate::sim::pool::EnergyPool;

    #[tokio::test(start_paused = true)]
    async fn station_grows_available_and_total_together() {
        let pool = Arc::new(EnergyPool::new(50));
        let cancel = CancellationToken::new();
        let station = Arc::new(Station::new("S1", ProductionProfile::default()));
        let ctx = ActorContext::new(Arc::clone(&pool), actor_rng(Some(3), 0), cancel.clone());
        let handle = tokio::spawn(Arc::clone(&station).run(ctx));

        tokio::time::sleep(Duration::from_millis(1)).await;
        let first = station.produced();
        assert!((5..=9).contains(&first), "one cycle runs immediately");
        assert_eq!(pool.snapshot(), (50 + first, 50 + first));

        tokio::time::sleep(Duration::from_secs(15)).await;
        let produced = station.produced();
        // at most one cycle per second, at least one per 1.5 s
        assert!(produced >= 5 * 10, "produced {produced}");
        assert!(produced <= 9 * 16, "produced {produced}");
        assert_eq!(pool.snapshot(), (50 + produced, 50 + produced));

        cancel.cancel();
        handle.await.expect("station task");
        assert_eq!(pool.total(), 50 + station.produced());
    }

    #[tokio::test]
    async fn cancelled_station_never_produces() {
        let pool = Arc::new(EnergyPool::new(50));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let station = Arc::new(Station::new("S1", ProductionProfile::default()));
        let ctx = ActorContext::new(Arc::clone(&pool), actor_rng(None, 0), cancel);
        Arc::clone(&station).run(ctx).await;

        assert_eq!(station.produced(), 0);
        assert_eq!(pool.total(), 50);
    }
}
