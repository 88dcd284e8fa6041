//! Periodic sampling of grid snapshots into telemetry rows.

use std::time::Duration;

use serde::Serialize;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::manager::SimulationManager;
use super::types::GridSnapshot;

/// One sampled snapshot, flattened for CSV export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TelemetryRow {
    /// Milliseconds since recording started.
    pub elapsed_ms: u64,
    /// Cumulative capacity ever granted.
    pub energy_total: u64,
    /// Unborrowed capacity at sampling time.
    pub energy_available: u64,
    /// Sum of the latest draw of every household.
    pub household_draw: u64,
    /// Number of registered renewable sources.
    pub renewable_sources: usize,
    /// Sum of all renewable capacities.
    pub renewable_capacity: u64,
}

impl TelemetryRow {
    /// Flattens a snapshot taken `elapsed` after recording started.
    pub fn from_snapshot(elapsed: Duration, snap: &GridSnapshot) -> Self {
        Self {
            elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            energy_total: snap.total,
            energy_available: snap.available,
            household_draw: snap.household_draw(),
            renewable_sources: snap.renewables.len(),
            renewable_capacity: snap.renewable_capacity(),
        }
    }
}

/// Samples a manager's snapshot at a fixed interval.
pub struct Recorder {
    interval: Duration,
    log_samples: bool,
}

impl Recorder {
    /// Creates a recorder sampling every `interval`.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            log_samples: false,
        }
    }

    /// Also log every sample at `info` level.
    pub fn with_logging(mut self, enabled: bool) -> Self {
        self.log_samples = enabled;
        self
    }

    /// Samples until `duration` elapses (if given) or `stop` fires.
    ///
    /// The first sample is taken immediately.
    pub async fn record(
        &self,
        manager: &SimulationManager,
        duration: Option<Duration>,
        stop: &CancellationToken,
    ) -> Vec<TelemetryRow> {
        let started = Instant::now();
        let deadline = duration.map(|d| started + d);
        let mut ticker = tokio::time::interval_at(started, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut rows = Vec::new();

        loop {
            // Scheduled tick time, not wall time.
            let scheduled = tokio::select! {
                biased;
                () = stop.cancelled() => break,
                at = ticker.tick() => at,
            };
            if deadline.is_some_and(|d| scheduled > d) {
                break;
            }

            let snap = manager.snapshot();
            if self.log_samples {
                info!(%snap, "grid state");
            }
            rows.push(TelemetryRow::from_snapshot(scheduled - started, &snap));
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use tokio::runtime::Handle;

    use super::*;
    use crate::config::GridConfig;

    #[tokio::test(start_paused = true)]
    async fn records_one_row_per_interval() {
        let mut cfg = GridConfig::baseline();
        cfg.simulation.seed = Some(1);
        let manager = SimulationManager::new(cfg, Handle::current()).expect("valid scenario");
        manager.start();

        let rows = Recorder::new(Duration::from_millis(500))
            .record(&manager, Some(Duration::from_secs(5)), &CancellationToken::new())
            .await;
        manager.shutdown().await;

        // samples at 0, 500, ..., 5000 ms
        assert_eq!(rows.len(), 11);
        assert_eq!(rows[0].elapsed_ms, 0);
        assert_eq!(rows[10].elapsed_ms, 5000);
        for pair in rows.windows(2) {
            assert!(pair[1].energy_total >= pair[0].energy_total);
        }
        for row in &rows {
            assert!(row.energy_available <= row.energy_total);
        }
    }

    #[tokio::test]
    async fn stop_token_ends_recording() {
        let manager =
            SimulationManager::new(GridConfig::baseline(), Handle::current()).expect("valid");
        let stop = CancellationToken::new();
        stop.cancel();

        let rows = Recorder::new(Duration::from_millis(10))
            .record(&manager, None, &stop)
            .await;
        assert!(rows.is_empty());
    }

    #[test]
    fn row_flattens_snapshot() {
        let snap = GridSnapshot {
            total: 90,
            available: 80,
            households: Vec::new(),
            renewables: vec![crate::sim::registry::RenewableSource {
                kind: "hydro".to_string(),
                capacity: 40,
            }],
        };
        let row = TelemetryRow::from_snapshot(Duration::from_millis(1500), &snap);
        assert_eq!(row.elapsed_ms, 1500);
        assert_eq!(row.energy_total, 90);
        assert_eq!(row.energy_available, 80);
        assert_eq!(row.renewable_sources, 1);
        assert_eq!(row.renewable_capacity, 40);
    }
}
