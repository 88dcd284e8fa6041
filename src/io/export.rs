//! CSV export for sampled grid telemetry.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::recorder::TelemetryRow;

/// Column header for CSV telemetry export.
const HEADER: &str = "elapsed_ms,energy_total,energy_available,household_draw,\
                      renewable_sources,renewable_capacity";

/// Exports telemetry rows to a CSV file at the given path.
///
/// Writes a header row followed by one data row per sample. Produces
/// deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(rows: &[TelemetryRow], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(rows, buf)
}

/// Writes telemetry rows as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(rows: &[TelemetryRow], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;
    for row in rows {
        wtr.serialize(row)?;
    }

    wtr.flush()?;
    Ok(())
}
