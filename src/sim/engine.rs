//! Step loop driving a storage device through a duty schedule.

use tracing::trace;

use crate::devices::{StorageDevice, StorageError};

use super::duty::DutyCycle;
use super::types::{SimConfig, StepResult};

/// Simulation engine owning the device, timing, and duty schedule.
///
/// Each step follows the device's two-phase protocol: query both
/// availabilities, clamp the duty command to them, then commit the flows via
/// `update`. Because every applied flow is bounded by a fresh availability
/// query, a run can only fail on a malformed timestep, never on charge
/// bounds.
pub struct Engine {
    config: SimConfig,
    device: StorageDevice,
    duty: DutyCycle,
}

impl Engine {
    /// Creates a new engine.
    pub fn new(config: SimConfig, device: StorageDevice, duty: DutyCycle) -> Self {
        Self {
            config,
            device,
            duty,
        }
    }

    /// Executes one timestep and returns its record.
    ///
    /// # Errors
    ///
    /// Propagates any [`StorageError`] from the device. With a valid
    /// [`SimConfig`] the availability clamp makes bounds errors unreachable.
    pub fn step(&mut self, t: usize) -> Result<StepResult, StorageError> {
        let dt_min = self.config.dt_min;
        let time_min = t as f64 * dt_min;

        let (commanded_charge_mw, commanded_discharge_mw) = self.duty.command_at_min(time_min);

        // Query phase
        let charge_avail_mw = self.device.charge_rate_avail_mw(dt_min)?;
        let discharge_avail_mw = self.device.discharge_rate_avail_mw(dt_min)?;

        // Command phase, clamped to what the device reported
        let applied_charge_mw = commanded_charge_mw.min(charge_avail_mw);
        let applied_discharge_mw = commanded_discharge_mw.min(discharge_avail_mw);
        self.device
            .update(dt_min, applied_charge_mw, applied_discharge_mw)?;

        trace!(
            t,
            applied_charge_mw, applied_discharge_mw, "engine step applied"
        );

        Ok(StepResult {
            step: t,
            time_min,
            commanded_charge_mw,
            commanded_discharge_mw,
            charge_avail_mw,
            discharge_avail_mw,
            applied_charge_mw,
            applied_discharge_mw,
            ramp_mw: self.device.ramp_mw,
            charge_mw_min: self.device.charge_mw_min(),
            soc: self.device.soc(),
        })
    }

    /// Executes all timesteps and returns the complete step record vector.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first device error.
    pub fn run(&mut self) -> Result<Vec<StepResult>, StorageError> {
        let mut results = Vec::with_capacity(self.config.steps);
        for t in 0..self.config.steps {
            results.push(self.step(t)?);
        }
        Ok(results)
    }

    /// The storage device in its current state.
    pub fn device(&self) -> &StorageDevice {
        &self.device
    }

    /// The simulation timing configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }
}
