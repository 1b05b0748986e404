//! Grid-scale battery energy storage simulator.

/// TOML scenario configuration and preset definitions.
pub mod config;
pub mod devices;
/// Telemetry export.
pub mod io;
/// Duty-cycle harness, step records, and summary reporting.
pub mod sim;
