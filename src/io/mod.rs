//! Result persistence for simulation output.

/// CSV export of step telemetry.
pub mod export;
