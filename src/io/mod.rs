/// CSV export of sampled telemetry.
pub mod export;
