use std::env;
use std::path::PathBuf;

use crate::telemetry::LogFormat;

/// Default headless run length in seconds.
pub const DEFAULT_DURATION_SECS: u64 = 10;
/// Default snapshot sampling interval in milliseconds.
pub const DEFAULT_SAMPLE_MS: u64 = 500;
/// Default API port.
pub const DEFAULT_PORT: u16 = 3000;

/// What the binary does once the grid is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Start the simulation, log snapshots, stop after the duration.
    Headless,
    /// Serve the HTTP API until shut down.
    Serve,
    /// Show the live terminal dashboard.
    Tui,
}

pub struct CliOptions {
    pub scenario: Option<PathBuf>,
    pub preset: Option<String>,
    pub seed: Option<u64>,
    /// Headless run length; `None` runs until Ctrl+C.
    pub duration_secs: Option<u64>,
    pub sample_ms: u64,
    pub telemetry_out: Option<PathBuf>,
    pub log_format: LogFormat,
    pub mode: RunMode,
    pub port: u16,
}

pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(args)
}

fn parse_args_from(args: Vec<String>) -> Result<CliOptions, String> {
    if args.len() == 1 && (args[0] == "--help" || args[0] == "-h") {
        print_usage();
        std::process::exit(0);
    }
    parse_options(&args)
}

fn parse_options(args: &[String]) -> Result<CliOptions, String> {
    let mut i = 0usize;
    let mut scenario = None;
    let mut preset = None;
    let mut seed = None;
    let mut duration_secs = Some(DEFAULT_DURATION_SECS);
    let mut sample_ms = DEFAULT_SAMPLE_MS;
    let mut telemetry_out = None;
    let mut log_format = LogFormat::default();
    let mut serve = false;
    let mut tui = false;
    let mut port = DEFAULT_PORT;

    while i < args.len() {
        match args[i].as_str() {
            "--scenario" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --scenario (expected a TOML file path)",
                )?;
                if scenario.replace(PathBuf::from(path)).is_some() {
                    return Err("--scenario provided more than once".to_string());
                }
            }
            "--preset" => {
                i += 1;
                let name = args.next_or_err(i, "missing value for --preset (expected a preset name)")?;
                if preset.replace(name.to_string()).is_some() {
                    return Err("--preset provided more than once".to_string());
                }
            }
            "--seed" => {
                i += 1;
                let value = args.next_or_err(i, "missing value for --seed (expected a u64)")?;
                seed = Some(parse_number::<u64>("--seed", value)?);
            }
            "--duration" => {
                i += 1;
                let value =
                    args.next_or_err(i, "missing value for --duration (expected seconds)")?;
                let secs = parse_number::<u64>("--duration", value)?;
                duration_secs = (secs > 0).then_some(secs);
            }
            "--sample-ms" => {
                i += 1;
                let value =
                    args.next_or_err(i, "missing value for --sample-ms (expected milliseconds)")?;
                sample_ms = parse_number::<u64>("--sample-ms", value)?;
                if sample_ms == 0 {
                    return Err("--sample-ms must be > 0".to_string());
                }
            }
            "--telemetry-out" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --telemetry-out (expected a file path)",
                )?;
                if telemetry_out.replace(PathBuf::from(path)).is_some() {
                    return Err("--telemetry-out provided more than once".to_string());
                }
            }
            "--log-format" => {
                i += 1;
                let value = args.next_or_err(
                    i,
                    "missing value for --log-format (expected \"pretty\" or \"json\")",
                )?;
                log_format = value.parse()?;
            }
            "--serve" if cfg!(feature = "api") => serve = true,
            "--port" if cfg!(feature = "api") => {
                i += 1;
                let value = args.next_or_err(i, "missing value for --port (expected a u16)")?;
                port = parse_number::<u16>("--port", value)?;
            }
            "--tui" if cfg!(feature = "tui") => tui = true,
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if scenario.is_some() && preset.is_some() {
        return Err(
            "arguments `--scenario` and `--preset` are mutually exclusive; choose one source"
                .to_string(),
        );
    }
    if serve && tui {
        return Err("arguments `--serve` and `--tui` are mutually exclusive".to_string());
    }

    if scenario.is_none() && preset.is_none() {
        preset = Some("baseline".to_string());
    }

    let mode = if tui {
        RunMode::Tui
    } else if serve {
        RunMode::Serve
    } else {
        RunMode::Headless
    };

    Ok(CliOptions {
        scenario,
        preset,
        seed,
        duration_secs,
        sample_ms,
        telemetry_out,
        log_format,
        mode,
        port,
    })
}

fn parse_number<T: std::str::FromStr>(flag: &str, value: &str) -> Result<T, String> {
    value
        .parse::<T>()
        .map_err(|_| format!("{flag} value \"{value}\" is not a valid number"))
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("microgrid-sim: concurrent micro-grid simulator");
    eprintln!();
    eprintln!("Usage: microgrid-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>        Load scenario from TOML config file");
    eprintln!("  --preset <name>          Use a built-in preset (baseline, scarce, surplus)");
    eprintln!("  --seed <u64>             Override random seed");
    eprintln!("  --duration <secs>        Headless run length, 0 = until Ctrl+C (default: 10)");
    eprintln!("  --sample-ms <ms>         Snapshot sampling interval (default: 500)");
    eprintln!("  --telemetry-out <path>   Export sampled snapshots to CSV");
    eprintln!("  --log-format <fmt>       pretty or json (default: pretty)");
    if cfg!(feature = "api") {
        eprintln!("  --serve                  Serve the REST API instead of a headless run");
        eprintln!("  --port <u16>             API server port (default: 3000)");
    }
    if cfg!(feature = "tui") {
        eprintln!("  --tui                    Show the live terminal dashboard");
    }
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the baseline preset is used.");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn defaults_to_baseline_headless() {
        let opts = parse_args_from(Vec::new()).expect("parse should succeed");
        assert_eq!(opts.preset.as_deref(), Some("baseline"));
        assert!(opts.scenario.is_none());
        assert_eq!(opts.duration_secs, Some(DEFAULT_DURATION_SECS));
        assert_eq!(opts.sample_ms, DEFAULT_SAMPLE_MS);
        assert_eq!(opts.mode, RunMode::Headless);
    }

    #[test]
    fn supports_scenario_cli() {
        let opts = parse_args_from(args(&["--scenario", "grid.toml"])).expect("parse should succeed");
        assert_eq!(
            opts.scenario.as_deref().and_then(|p| p.to_str()),
            Some("grid.toml")
        );
        assert!(opts.preset.is_none());
    }

    #[test]
    fn supports_run_tuning() {
        let opts = parse_args_from(args(&[
            "--preset",
            "scarce",
            "--seed",
            "9",
            "--duration",
            "0",
            "--sample-ms",
            "250",
            "--telemetry-out",
            "out.csv",
            "--log-format",
            "json",
        ]))
        .expect("parse should succeed");
        assert_eq!(opts.preset.as_deref(), Some("scarce"));
        assert_eq!(opts.seed, Some(9));
        assert_eq!(opts.duration_secs, None, "0 means run until Ctrl+C");
        assert_eq!(opts.sample_ms, 250);
        assert_eq!(
            opts.telemetry_out.as_deref().and_then(|p| p.to_str()),
            Some("out.csv")
        );
        assert_eq!(opts.log_format, LogFormat::Json);
    }

    #[test]
    fn rejects_conflicting_sources() {
        let err = parse_args_from(args(&["--scenario", "a.toml", "--preset", "baseline"]));
        assert!(err.is_err());
    }

    #[test]
    fn rejects_bad_numbers() {
        assert!(parse_args_from(args(&["--seed", "abc"])).is_err());
        assert!(parse_args_from(args(&["--sample-ms", "0"])).is_err());
        assert!(parse_args_from(args(&["--duration"])).is_err());
    }

    #[test]
    fn rejects_unknown_argument() {
        let err = parse_args_from(args(&["--bogus"]));
        assert_eq!(err.err().as_deref(), Some("unknown argument: --bogus"));
    }

    #[cfg(feature = "api")]
    #[test]
    fn supports_serve_mode() {
        let opts = parse_args_from(args(&["--serve", "--port", "8080"])).expect("parse should succeed");
        assert_eq!(opts.mode, RunMode::Serve);
        assert_eq!(opts.port, 8080);
    }
}
