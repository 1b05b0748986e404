//! Shared test fixtures for integration tests.

use bess_sim::config::{DutyPhaseConfig, ScenarioConfig, StorageConfig};
use bess_sim::devices::{BatterySpec, StorageDevice};
use bess_sim::sim::duty::{DutyCycle, DutyMode, DutyPhase};
use bess_sim::sim::engine::Engine;
use bess_sim::sim::types::SimConfig;

/// Builds the storage device a scenario's `[storage]` section describes.
pub fn device_from_config(cfg: &StorageConfig) -> StorageDevice {
    let device = match cfg.variant.as_str() {
        "battery" => BatterySpec {
            capacity_mwh: cfg.capacity_mwh,
            rate_max_mw: cfg.rate_max_mw,
            round_trip_eff_pct: cfg.round_trip_eff_pct,
            init_charge_frac: cfg.init_charge_frac,
        }
        .build(),
        _ => StorageDevice::new(
            cfg.capacity_mwh,
            cfg.charge_rate_max_mw,
            cfg.discharge_rate_max_mw,
            cfg.round_trip_eff_pct,
            cfg.tau_min,
            cfg.init_charge_frac,
            cfg.cost_install_per_kw,
            cfg.cost_om_fix_per_kw_yr,
        ),
    };
    device.expect("test scenario device parameters should be valid")
}

/// Builds the duty cycle a scenario's `[[duty]]` phases describe.
pub fn duty_from_config(phases: &[DutyPhaseConfig]) -> DutyCycle {
    DutyCycle::new(
        phases
            .iter()
            .map(|p| DutyPhase {
                mode: DutyMode::from_name(&p.mode).unwrap_or(DutyMode::Idle),
                power_mw: p.power_mw,
                duration_min: p.duration_min,
            })
            .collect(),
    )
}

/// Builds a ready-to-run engine from a complete scenario.
pub fn engine_from_scenario(cfg: &ScenarioConfig) -> Engine {
    let device = device_from_config(&cfg.storage);
    let duty = duty_from_config(&cfg.duty);
    let sim_config = SimConfig::new(cfg.simulation.dt_min, cfg.simulation.steps);
    Engine::new(sim_config, device, duty)
}
