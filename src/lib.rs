//! Concurrent micro-grid simulator: households borrow energy from a shared
//! pool that stations and renewable sources keep growing.

#[cfg(feature = "api")]
pub mod api;
pub mod cli;
pub mod config;
/// Household and station actors.
pub mod devices;
pub mod error;
/// Telemetry export.
pub mod io;
/// Pool, registry, manager and recorder.
pub mod sim;
pub mod telemetry;
#[cfg(feature = "tui")]
pub mod tui;

pub use error::GridError;
