//! Core simulation types: timing configuration and step records.

use std::fmt;

/// Centralized simulation timing.
///
/// The engine and the duty schedule both reference this struct, so the
/// timestep length is defined in exactly one place.
///
/// # Examples
///
/// ```
/// use bess_sim::sim::types::SimConfig;
///
/// let cfg = SimConfig::new(1.0, 1440);
/// assert_eq!(cfg.total_min(), 1440.0);
/// ```
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Duration of one timestep (minutes).
    pub dt_min: f64,
    /// Number of timesteps to simulate.
    pub steps: usize,
}

impl SimConfig {
    /// Creates a new simulation timing configuration.
    ///
    /// # Panics
    ///
    /// Panics if `dt_min` is not a positive finite number or `steps` is zero.
    pub fn new(dt_min: f64, steps: usize) -> Self {
        assert!(
            dt_min > 0.0 && dt_min.is_finite(),
            "dt_min must be a positive finite number of minutes"
        );
        assert!(steps > 0, "steps must be > 0");
        Self { dt_min, steps }
    }

    /// Total simulated duration (minutes).
    pub fn total_min(&self) -> f64 {
        self.dt_min * self.steps as f64
    }
}

/// Complete record of one simulation timestep.
#[derive(Debug, Clone)]
pub struct StepResult {
    /// Timestep index.
    pub step: usize,
    /// Simulation time at the start of the step (minutes).
    pub time_min: f64,
    /// Charging power the duty schedule asked for (MW).
    pub commanded_charge_mw: f64,
    /// Discharging power the duty schedule asked for (MW).
    pub commanded_discharge_mw: f64,
    /// Charging power the device reported as available (MW).
    pub charge_avail_mw: f64,
    /// Discharging power the device reported as available (MW).
    pub discharge_avail_mw: f64,
    /// Charging power actually applied, pre-efficiency (MW).
    pub applied_charge_mw: f64,
    /// Discharging power actually applied (MW).
    pub applied_discharge_mw: f64,
    /// Observed rate of change of stored energy (MW).
    pub ramp_mw: f64,
    /// Stored energy after the step (MW·min).
    pub charge_mw_min: f64,
    /// State of charge after the step (0.0 to 1.0).
    pub soc: f64,
}

impl fmt::Display for StepResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={:>5} ({:>8.1} min) | cmd chg={:>6.2} dis={:>6.2} MW | \
             avail chg={:>6.2} dis={:>6.2} MW | applied chg={:>6.2} dis={:>6.2} MW | \
             ramp={:>6.2} MW | charge={:>9.1} MW·min (SoC={:>5.1}%)",
            self.step,
            self.time_min,
            self.commanded_charge_mw,
            self.commanded_discharge_mw,
            self.charge_avail_mw,
            self.discharge_avail_mw,
            self.applied_charge_mw,
            self.applied_discharge_mw,
            self.ramp_mw,
            self.charge_mw_min,
            self.soc * 100.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_config_basic() {
        let cfg = SimConfig::new(1.0, 1440);
        assert_eq!(cfg.dt_min, 1.0);
        assert_eq!(cfg.steps, 1440);
        assert_eq!(cfg.total_min(), 1440.0);
    }

    #[test]
    fn sim_config_subminute_steps() {
        let cfg = SimConfig::new(0.25, 240);
        assert_eq!(cfg.total_min(), 60.0);
    }

    #[test]
    #[should_panic]
    fn sim_config_zero_dt_panics() {
        SimConfig::new(0.0, 10);
    }

    #[test]
    #[should_panic]
    fn sim_config_zero_steps_panics() {
        SimConfig::new(1.0, 0);
    }

    #[test]
    fn step_result_display_does_not_panic() {
        let r = StepResult {
            step: 3,
            time_min: 3.0,
            commanded_charge_mw: 20.0,
            commanded_discharge_mw: 0.0,
            charge_avail_mw: 30.0,
            discharge_avail_mw: 12.5,
            applied_charge_mw: 20.0,
            applied_discharge_mw: 0.0,
            ramp_mw: 17.0,
            charge_mw_min: 431.0,
            soc: 0.2394,
        };
        let s = format!("{r}");
        assert!(!s.is_empty());
    }
}
