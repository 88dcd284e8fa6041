//! Micro-grid simulator entry point: CLI wiring and run-mode dispatch.

use std::error::Error;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use microgrid_sim::cli::{self, CliOptions, RunMode};
use microgrid_sim::config::GridConfig;
use microgrid_sim::io::export::export_csv;
use microgrid_sim::sim::SimulationManager;
use microgrid_sim::sim::recorder::Recorder;
use microgrid_sim::telemetry::{init_tracing, shutdown_signal};

type BoxError = Box<dyn Error + Send + Sync>;

fn main() {
    let opts = match cli::parse_args() {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("error: {e}");
            cli::print_usage();
            process::exit(1);
        }
    };

    // The dashboard owns the terminal; log lines would tear it.
    let logging = opts.mode != RunMode::Tui;
    if logging {
        init_tracing(opts.log_format);
    }

    if let Err(e) = run(&opts) {
        if logging {
            error!(error = %e, "simulation failed");
        } else {
            eprintln!("error: {e}");
        }
        process::exit(1);
    }
}

/// Loads the scenario: `--scenario` file, else `--preset`, else baseline.
fn load_config(opts: &CliOptions) -> Result<(GridConfig, String), BoxError> {
    let (mut cfg, name) = match (&opts.scenario, &opts.preset) {
        (Some(path), _) => {
            let name = path
                .file_stem()
                .map_or_else(|| "scenario".to_string(), |s| s.to_string_lossy().into_owned());
            (GridConfig::from_toml_file(path)?, name)
        }
        (None, Some(preset)) => (GridConfig::from_preset(preset)?, preset.clone()),
        (None, None) => (GridConfig::baseline(), "baseline".to_string()),
    };
    if let Some(seed) = opts.seed {
        cfg.simulation.seed = Some(seed);
    }
    Ok((cfg, name))
}

fn run(opts: &CliOptions) -> Result<(), BoxError> {
    let (cfg, name) = load_config(opts)?;
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let manager = Arc::new(SimulationManager::new(cfg, rt.handle().clone())?);

    match opts.mode {
        RunMode::Headless => run_headless(&rt, &manager, &name, opts),
        RunMode::Serve => run_server(&rt, &manager, opts.port),
        RunMode::Tui => run_dashboard(&rt, &manager, &name),
    }
}

/// Starts the grid, samples it for the configured duration, then stops.
fn run_headless(
    rt: &Runtime,
    manager: &Arc<SimulationManager>,
    name: &str,
    opts: &CliOptions,
) -> Result<(), BoxError> {
    let duration = opts.duration_secs.map(Duration::from_secs);
    info!(
        scenario = name,
        households = manager.config().households.count,
        stations = manager.config().stations.count,
        duration_secs = ?opts.duration_secs,
        "starting headless run"
    );

    let rows = rt.block_on(async {
        let stop = CancellationToken::new();
        let on_signal = stop.clone();
        tokio::spawn(async move {
            shutdown_signal().await;
            on_signal.cancel();
        });

        manager.start();
        let rows = Recorder::new(Duration::from_millis(opts.sample_ms))
            .with_logging(true)
            .record(manager, duration, &stop)
            .await;
        manager.shutdown().await;
        rows
    });
    info!(
        household_cycles = manager.household_cycles(),
        station_output = manager.station_output(),
        "headless run finished"
    );

    println!("{}", manager.snapshot());

    if let Some(path) = &opts.telemetry_out {
        export_csv(&rows, path)?;
        info!(path = %path.display(), rows = rows.len(), "telemetry written");
    }
    Ok(())
}

#[cfg(feature = "api")]
fn run_server(rt: &Runtime, manager: &Arc<SimulationManager>, port: u16) -> Result<(), BoxError> {
    use std::net::SocketAddr;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    rt.block_on(microgrid_sim::api::serve(
        Arc::clone(manager),
        addr,
        shutdown_signal(),
    ))?;
    rt.block_on(manager.shutdown());
    Ok(())
}

#[cfg(not(feature = "api"))]
fn run_server(_: &Runtime, _: &Arc<SimulationManager>, _: u16) -> Result<(), BoxError> {
    Err("built without the `api` feature".into())
}

#[cfg(feature = "tui")]
fn run_dashboard(rt: &Runtime, manager: &Arc<SimulationManager>, name: &str) -> Result<(), BoxError> {
    let result = microgrid_sim::tui::run(Arc::clone(manager), name);
    rt.block_on(manager.shutdown());
    Ok(result?)
}

#[cfg(not(feature = "tui"))]
fn run_dashboard(_: &Runtime, _: &Arc<SimulationManager>, _: &str) -> Result<(), BoxError> {
    Err("built without the `tui` feature".into())
}
