//! CSV export for simulation step results.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::types::StepResult;

/// Schema v1 column header for CSV telemetry export.
const HEADER: &str = "step,time_min,commanded_charge_mw,commanded_discharge_mw,\
                      charge_avail_mw,discharge_avail_mw,applied_charge_mw,\
                      applied_discharge_mw,ramp_mw,charge_mw_min,soc";

/// Exports simulation results to a CSV file at the given path.
///
/// Writes a header row followed by one data row per step using the schema v1
/// column layout. Produces deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(results: &[StepResult], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(results, buf)
}

/// Writes simulation results as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(results: &[StepResult], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    // Header
    wtr.write_record(HEADER.split(',').map(str::trim))?;

    // Data rows
    for r in results {
        wtr.write_record(&[
            r.step.to_string(),
            format!("{:.2}", r.time_min),
            format!("{:.4}", r.commanded_charge_mw),
            format!("{:.4}", r.commanded_discharge_mw),
            format!("{:.4}", r.charge_avail_mw),
            format!("{:.4}", r.discharge_avail_mw),
            format!("{:.4}", r.applied_charge_mw),
            format!("{:.4}", r.applied_discharge_mw),
            format!("{:.4}", r.ramp_mw),
            format!("{:.4}", r.charge_mw_min),
            format!("{:.6}", r.soc),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
