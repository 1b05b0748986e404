//! Post-hoc summary aggregation from simulation results.

use std::fmt;

use super::types::StepResult;

/// Aggregate summary derived from a complete simulation run.
///
/// Computed post-hoc from `&[StepResult]` so the report always agrees with
/// the step records. Purely diagnostic; carries no cost figures.
#[derive(Debug, Clone)]
pub struct SummaryReport {
    /// Energy drawn from the grid for charging, pre-efficiency (MWh).
    pub grid_energy_in_mwh: f64,
    /// Energy delivered back to the grid (MWh).
    pub energy_delivered_mwh: f64,
    /// Net change of stored energy over the run (MWh).
    pub storage_delta_mwh: f64,
    /// Charge-leg conversion loss by energy balance (MWh).
    pub conversion_loss_mwh: f64,
    /// Total terminal throughput, in plus out (MWh).
    pub throughput_mwh: f64,
    /// Equivalent full cycles, `throughput / (2 * capacity)`.
    pub equivalent_full_cycles: f64,
    /// Largest applied charging power (MW).
    pub peak_charge_mw: f64,
    /// Largest applied discharging power (MW).
    pub peak_discharge_mw: f64,
    /// Lowest state of charge seen after any step.
    pub min_soc: f64,
    /// Highest state of charge seen after any step.
    pub max_soc: f64,
    /// State of charge after the final step.
    pub final_soc: f64,
}

impl SummaryReport {
    /// Computes the summary from the complete step record vector.
    ///
    /// # Arguments
    ///
    /// * `results` - Complete simulation step results
    /// * `dt_min` - Timestep duration in minutes
    /// * `capacity_mwh` - Device capacity for the cycle calculation
    pub fn from_results(results: &[StepResult], dt_min: f64, capacity_mwh: f64) -> Self {
        if results.is_empty() {
            return Self {
                grid_energy_in_mwh: 0.0,
                energy_delivered_mwh: 0.0,
                storage_delta_mwh: 0.0,
                conversion_loss_mwh: 0.0,
                throughput_mwh: 0.0,
                equivalent_full_cycles: 0.0,
                peak_charge_mw: 0.0,
                peak_discharge_mw: 0.0,
                min_soc: 0.0,
                max_soc: 0.0,
                final_soc: 0.0,
            };
        }

        let mut energy_in = 0.0_f64;
        let mut energy_out = 0.0_f64;
        let mut peak_charge = 0.0_f64;
        let mut peak_discharge = 0.0_f64;
        let mut min_soc = f64::INFINITY;
        let mut max_soc = f64::NEG_INFINITY;

        for r in results {
            energy_in += r.applied_charge_mw * dt_min / 60.0;
            energy_out += r.applied_discharge_mw * dt_min / 60.0;
            peak_charge = peak_charge.max(r.applied_charge_mw);
            peak_discharge = peak_discharge.max(r.applied_discharge_mw);
            min_soc = min_soc.min(r.soc);
            max_soc = max_soc.max(r.soc);
        }

        // Charge before the first step, recovered from its observed ramp.
        let first = &results[0];
        let initial_charge_mw_min = first.charge_mw_min - first.ramp_mw * dt_min;
        let last = &results[results.len() - 1];
        let storage_delta_mwh = (last.charge_mw_min - initial_charge_mw_min) / 60.0;

        let throughput = energy_in + energy_out;
        let cycles = if capacity_mwh > 0.0 {
            throughput / (2.0 * capacity_mwh)
        } else {
            0.0
        };

        Self {
            grid_energy_in_mwh: energy_in,
            energy_delivered_mwh: energy_out,
            storage_delta_mwh,
            conversion_loss_mwh: energy_in - energy_out - storage_delta_mwh,
            throughput_mwh: throughput,
            equivalent_full_cycles: cycles,
            peak_charge_mw: peak_charge,
            peak_discharge_mw: peak_discharge,
            min_soc,
            max_soc,
            final_soc: last.soc,
        }
    }
}

impl fmt::Display for SummaryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Storage Summary ---")?;
        writeln!(f, "Grid energy in:      {:.3} MWh", self.grid_energy_in_mwh)?;
        writeln!(f, "Energy delivered:    {:.3} MWh", self.energy_delivered_mwh)?;
        writeln!(f, "Storage delta:       {:+.3} MWh", self.storage_delta_mwh)?;
        writeln!(f, "Conversion loss:     {:.3} MWh", self.conversion_loss_mwh)?;
        writeln!(
            f,
            "Throughput:          {:.3} MWh ({:.2} equiv. cycles)",
            self.throughput_mwh, self.equivalent_full_cycles
        )?;
        writeln!(
            f,
            "Peak charge:         {:.2} MW / peak discharge: {:.2} MW",
            self.peak_charge_mw, self.peak_discharge_mw
        )?;
        write!(
            f,
            "SoC range:           {:.1}%..{:.1}% (final {:.1}%)",
            self.min_soc * 100.0,
            self.max_soc * 100.0,
            self.final_soc * 100.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_step(
        step: usize,
        applied_charge_mw: f64,
        applied_discharge_mw: f64,
        ramp_mw: f64,
        charge_mw_min: f64,
    ) -> StepResult {
        StepResult {
            step,
            time_min: step as f64,
            commanded_charge_mw: applied_charge_mw,
            commanded_discharge_mw: applied_discharge_mw,
            charge_avail_mw: 30.0,
            discharge_avail_mw: 30.0,
            applied_charge_mw,
            applied_discharge_mw,
            ramp_mw,
            charge_mw_min,
            soc: charge_mw_min / 1800.0,
        }
    }

    #[test]
    fn empty_results_yield_zeroed_report() {
        let report = SummaryReport::from_results(&[], 1.0, 30.0);
        assert_eq!(report.grid_energy_in_mwh, 0.0);
        assert_eq!(report.equivalent_full_cycles, 0.0);
        assert_eq!(report.final_soc, 0.0);
    }

    #[test]
    fn energy_balance_accounts_for_charge_leg_loss() {
        // one step charging 10 MW at 85% (ramp 8.5), one step releasing 5 MW
        let results = vec![
            make_step(0, 10.0, 0.0, 8.5, 8.5),
            make_step(1, 0.0, 5.0, -5.0, 3.5),
        ];
        let report = SummaryReport::from_results(&results, 1.0, 30.0);

        assert!((report.grid_energy_in_mwh - 10.0 / 60.0).abs() < 1e-12);
        assert!((report.energy_delivered_mwh - 5.0 / 60.0).abs() < 1e-12);
        assert!((report.storage_delta_mwh - 3.5 / 60.0).abs() < 1e-12);
        // loss = in - out - delta = (10 - 5 - 3.5)/60 = 1.5/60 MWh
        assert!((report.conversion_loss_mwh - 1.5 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn throughput_and_cycles() {
        // 60 steps charging at 30 MW: 30 MWh in, no discharge
        let results: Vec<StepResult> = (0..60)
            .map(|t| make_step(t, 30.0, 0.0, 25.5, 25.5 * (t as f64 + 1.0)))
            .collect();
        let report = SummaryReport::from_results(&results, 1.0, 30.0);
        assert!((report.throughput_mwh - 30.0).abs() < 1e-9);
        assert!((report.equivalent_full_cycles - 0.5).abs() < 1e-9);
    }

    #[test]
    fn peaks_and_soc_range() {
        let results = vec![
            make_step(0, 12.0, 0.0, 10.2, 910.2),
            make_step(1, 0.0, 25.0, -25.0, 885.2),
            make_step(2, 5.0, 0.0, 4.25, 889.45),
        ];
        let report = SummaryReport::from_results(&results, 1.0, 30.0);
        assert_eq!(report.peak_charge_mw, 12.0);
        assert_eq!(report.peak_discharge_mw, 25.0);
        assert!((report.max_soc - 910.2 / 1800.0).abs() < 1e-12);
        assert!((report.min_soc - 885.2 / 1800.0).abs() < 1e-12);
        assert_eq!(report.final_soc, 889.45 / 1800.0);
    }

    #[test]
    fn display_does_not_panic() {
        let results = vec![make_step(0, 10.0, 0.0, 8.5, 8.5)];
        let report = SummaryReport::from_results(&results, 1.0, 30.0);
        let s = format!("{report}");
        assert!(s.contains("Storage Summary"));
    }
}
