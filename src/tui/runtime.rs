//! TUI application state over a live grid.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;

use crate::sim::{GridSnapshot, SimulationManager};

/// Maximum number of history entries kept for the rolling chart.
const MAX_HISTORY: usize = 200;

/// Refresh interval options in milliseconds (slowest → fastest).
const SPEED_LEVELS_MS: [u64; 5] = [1000, 500, 250, 100, 50];

/// Default speed index (250 ms).
const DEFAULT_SPEED_IDX: usize = 2;

/// Renewable sources offered on the number keys: `(kind, capacity)`.
pub const RENEWABLE_SHORTCUTS: [(&str, i64); 3] = [("solar", 20), ("wind", 15), ("hydro", 30)];

/// One chart point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Seconds since the dashboard opened.
    pub elapsed_s: f64,
    /// Pool total at sampling time.
    pub total: u64,
    /// Pool available at sampling time.
    pub available: u64,
}

/// TUI application state.
pub struct App {
    /// Grid being displayed.
    manager: Arc<SimulationManager>,
    /// Rolling history of pool counters for the chart.
    pub history: VecDeque<Sample>,
    /// Most recent snapshot.
    pub latest: GridSnapshot,
    /// Current index into `SPEED_LEVELS_MS`.
    pub speed_idx: usize,
    /// Whether the user has requested quit.
    pub quit: bool,
    /// When the dashboard opened.
    pub opened_at: Instant,
    /// When the last refresh was executed.
    pub last_tick: Instant,
    /// Name of the scenario being run.
    pub scenario_name: String,
    /// Outcome of the last user action, shown in the status bar.
    pub message: String,
}

impl App {
    /// Creates a dashboard over `manager`.
    pub fn new(manager: Arc<SimulationManager>, scenario_name: &str) -> Self {
        let latest = manager.snapshot();
        let now = Instant::now();
        Self {
            manager,
            history: VecDeque::with_capacity(MAX_HISTORY),
            latest,
            speed_idx: DEFAULT_SPEED_IDX,
            quit: false,
            opened_at: now,
            last_tick: now,
            scenario_name: scenario_name.to_string(),
            message: "press s to start".to_string(),
        }
    }

    /// Takes a fresh snapshot and appends it to the chart history.
    pub fn tick(&mut self) {
        self.latest = self.manager.snapshot();
        if self.history.len() >= MAX_HISTORY {
            self.history.pop_front();
        }
        self.history.push_back(Sample {
            elapsed_s: self.opened_at.elapsed().as_secs_f64(),
            total: self.latest.total,
            available: self.latest.available,
        });
    }

    /// Starts the simulation (no-op when already running).
    pub fn start(&mut self) {
        self.message = if self.manager.start() {
            "simulation started".to_string()
        } else {
            "simulation already running".to_string()
        };
    }

    /// Registers the renewable bound to shortcut `idx`.
    pub fn add_renewable(&mut self, idx: usize) {
        let Some(&(kind, capacity)) = RENEWABLE_SHORTCUTS.get(idx) else {
            return;
        };
        self.message = match self.manager.add_renewable(kind, capacity) {
            Ok(source) => format!("added {} (+{})", source.kind, source.capacity),
            Err(e) => e.to_string(),
        };
        self.tick();
    }

    /// Returns `true` while actors are running.
    pub fn is_running(&self) -> bool {
        self.manager.is_running()
    }

    /// Increases refresh rate (shorter tick interval).
    pub fn speed_up(&mut self) {
        if self.speed_idx + 1 < SPEED_LEVELS_MS.len() {
            self.speed_idx += 1;
        }
    }

    /// Decreases refresh rate (longer tick interval).
    pub fn speed_down(&mut self) {
        if self.speed_idx > 0 {
            self.speed_idx -= 1;
        }
    }

    /// Returns the current tick interval in milliseconds.
    pub fn tick_interval_ms(&self) -> u64 {
        SPEED_LEVELS_MS[self.speed_idx]
    }
}

#[cfg(test)]
mod tests {
    use tokio::runtime::Handle;

    use super::*;
    use crate::config::GridConfig;

    fn app() -> App {
        let mut cfg = GridConfig::baseline();
        cfg.simulation.seed = Some(5);
        let manager = SimulationManager::new(cfg, Handle::current()).expect("valid scenario");
        App::new(Arc::new(manager), "baseline")
    }

    #[tokio::test]
    async fn app_creates_and_ticks() {
        let mut app = app();
        assert!(app.history.is_empty());
        assert_eq!(app.latest.total, 50);

        app.tick();
        app.tick();
        assert_eq!(app.history.len(), 2);
    }

    #[tokio::test]
    async fn history_caps_at_max() {
        let mut app = app();
        for _ in 0..MAX_HISTORY + 25 {
            app.tick();
        }
        assert_eq!(app.history.len(), MAX_HISTORY);
    }

    #[tokio::test]
    async fn start_twice_reports_already_running() {
        let mut app = app();
        app.start();
        assert!(app.is_running());
        assert_eq!(app.message, "simulation started");
        app.start();
        assert_eq!(app.message, "simulation already running");
        app.manager.shutdown().await;
    }

    #[tokio::test]
    async fn renewable_shortcut_grows_pool() {
        let mut app = app();
        app.add_renewable(2);
        assert_eq!(app.latest.total, 80);
        assert_eq!(app.latest.renewables.len(), 1);
        assert_eq!(app.message, "added hydro (+30)");

        app.add_renewable(9); // unbound key
        assert_eq!(app.latest.renewables.len(), 1);
    }

    #[tokio::test]
    async fn speed_controls_stay_in_bounds() {
        let mut app = app();
        for _ in 0..10 {
            app.speed_down();
        }
        assert_eq!(app.speed_idx, 0);
        for _ in 0..10 {
            app.speed_up();
        }
        assert_eq!(app.speed_idx, SPEED_LEVELS_MS.len() - 1);
    }
}
