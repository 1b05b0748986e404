//! TOML-based scenario configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::sim::duty::DutyMode;

/// Top-level scenario configuration parsed from TOML.
///
/// Every section has per-field defaults, so a partial TOML file is enough.
/// Load from TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Simulation timing parameters.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Storage device parameters.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Duty schedule phases, in order. Missing phases mean an all-idle run.
    #[serde(default)]
    pub duty: Vec<DutyPhaseConfig>,
}

/// Simulation timing parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Timestep length (minutes, must be > 0).
    pub dt_min: f64,
    /// Number of timesteps to simulate (must be > 0).
    pub steps: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            dt_min: 1.0,
            steps: 1440,
        }
    }
}

/// Storage device parameters.
///
/// `variant` selects the construction policy: `"general"` uses the two
/// independent rate caps, `"battery"` uses the single symmetric
/// `rate_max_mw` (and fixes the charge efficiency at 85% regardless of
/// `round_trip_eff_pct`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Construction policy: `"general"` or `"battery"`.
    pub variant: String,
    /// Storage capacity (MWh).
    pub capacity_mwh: f64,
    /// Maximum charging power for the general variant (MW).
    pub charge_rate_max_mw: f64,
    /// Maximum discharging power for the general variant (MW).
    pub discharge_rate_max_mw: f64,
    /// Symmetric power rating for the battery variant (MW).
    pub rate_max_mw: f64,
    /// Round-trip efficiency (percent, charge leg only).
    pub round_trip_eff_pct: f64,
    /// Discharge throttle time constant (minutes).
    pub tau_min: f64,
    /// Initial charge as a fraction of capacity (0.0 to 1.0).
    pub init_charge_frac: f64,
    /// Installation cost ($/kW), carried for downstream study tooling.
    pub cost_install_per_kw: f64,
    /// Fixed O&M cost ($/kW/yr), carried for downstream study tooling.
    pub cost_om_fix_per_kw_yr: f64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            variant: "battery".to_string(),
            capacity_mwh: 30.0,
            charge_rate_max_mw: 30.0,
            discharge_rate_max_mw: 30.0,
            rate_max_mw: 30.0,
            round_trip_eff_pct: 85.0,
            tau_min: 30.0,
            init_charge_frac: 0.0,
            cost_install_per_kw: 2067.0,
            cost_om_fix_per_kw_yr: 35.6,
        }
    }
}

/// One duty schedule phase.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DutyPhaseConfig {
    /// Phase mode: `"charge"`, `"discharge"`, or `"idle"`.
    pub mode: String,
    /// Commanded power magnitude (MW, ignored for idle).
    pub power_mw: f64,
    /// Phase length (minutes, must be > 0).
    pub duration_min: f64,
}

impl Default for DutyPhaseConfig {
    fn default() -> Self {
        Self {
            mode: "idle".to_string(),
            power_mw: 0.0,
            duration_min: 60.0,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"storage.capacity_mwh"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {} — {}", self.field, self.message)
    }
}

impl ScenarioConfig {
    /// Returns the baseline scenario: the default 30 MWh / 30 MW battery
    /// worked through one charge/hold/discharge day at 1-minute resolution.
    pub fn baseline() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            storage: StorageConfig::default(),
            duty: vec![
                DutyPhaseConfig {
                    mode: "charge".to_string(),
                    power_mw: 25.0,
                    duration_min: 120.0,
                },
                DutyPhaseConfig {
                    mode: "idle".to_string(),
                    power_mw: 0.0,
                    duration_min: 240.0,
                },
                DutyPhaseConfig {
                    mode: "discharge".to_string(),
                    power_mw: 20.0,
                    duration_min: 180.0,
                },
            ],
        }
    }

    /// Returns the deep-discharge preset: a full battery drained at its
    /// rating for long enough that the near-empty throttle dominates.
    pub fn deep_discharge() -> Self {
        Self {
            simulation: SimulationConfig {
                dt_min: 1.0,
                steps: 720,
            },
            storage: StorageConfig {
                init_charge_frac: 1.0,
                ..StorageConfig::default()
            },
            duty: vec![DutyPhaseConfig {
                mode: "discharge".to_string(),
                power_mw: 30.0,
                duration_min: 720.0,
            }],
        }
    }

    /// Returns the asymmetric preset: a general device that charges slowly
    /// and discharges hard.
    pub fn asymmetric() -> Self {
        Self {
            simulation: SimulationConfig {
                dt_min: 1.0,
                steps: 480,
            },
            storage: StorageConfig {
                variant: "general".to_string(),
                capacity_mwh: 20.0,
                charge_rate_max_mw: 10.0,
                discharge_rate_max_mw: 40.0,
                init_charge_frac: 0.2,
                ..StorageConfig::default()
            },
            duty: vec![
                DutyPhaseConfig {
                    mode: "charge".to_string(),
                    power_mw: 10.0,
                    duration_min: 300.0,
                },
                DutyPhaseConfig {
                    mode: "discharge".to_string(),
                    power_mw: 40.0,
                    duration_min: 90.0,
                },
            ],
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "deep_discharge", "asymmetric"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "deep_discharge" => Ok(Self::deep_discharge()),
            "asymmetric" => Ok(Self::asymmetric()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is
    /// invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown
    /// fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if the configuration is valid. Device
    /// constraints are checked again at construction; validating here first
    /// gives the dotted field path instead of a constructor error.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let sim = &self.simulation;
        if !(sim.dt_min > 0.0 && sim.dt_min.is_finite()) {
            errors.push(ConfigError {
                field: "simulation.dt_min".into(),
                message: "must be a positive finite number of minutes".into(),
            });
        }
        if sim.steps == 0 {
            errors.push(ConfigError {
                field: "simulation.steps".into(),
                message: "must be > 0".into(),
            });
        }

        let sto = &self.storage;
        if sto.variant != "general" && sto.variant != "battery" {
            errors.push(ConfigError {
                field: "storage.variant".into(),
                message: format!(
                    "must be \"general\" or \"battery\", got \"{}\"",
                    sto.variant
                ),
            });
        }
        if !(sto.capacity_mwh > 0.0) {
            errors.push(ConfigError {
                field: "storage.capacity_mwh".into(),
                message: "must be > 0".into(),
            });
        }
        if sto.variant == "general" {
            if !(sto.charge_rate_max_mw > 0.0) {
                errors.push(ConfigError {
                    field: "storage.charge_rate_max_mw".into(),
                    message: "must be > 0".into(),
                });
            }
            if !(sto.discharge_rate_max_mw > 0.0) {
                errors.push(ConfigError {
                    field: "storage.discharge_rate_max_mw".into(),
                    message: "must be > 0".into(),
                });
            }
        }
        if sto.variant == "battery" && !(sto.rate_max_mw > 0.0) {
            errors.push(ConfigError {
                field: "storage.rate_max_mw".into(),
                message: "must be > 0".into(),
            });
        }
        if !(sto.round_trip_eff_pct > 0.0 && sto.round_trip_eff_pct <= 100.0) {
            errors.push(ConfigError {
                field: "storage.round_trip_eff_pct".into(),
                message: "must be in (0, 100]".into(),
            });
        }
        if !(sto.tau_min > 0.0) {
            errors.push(ConfigError {
                field: "storage.tau_min".into(),
                message: "must be > 0".into(),
            });
        }
        if !(0.0..=1.0).contains(&sto.init_charge_frac) {
            errors.push(ConfigError {
                field: "storage.init_charge_frac".into(),
                message: "must be in [0, 1]".into(),
            });
        }

        for (i, phase) in self.duty.iter().enumerate() {
            if DutyMode::from_name(&phase.mode).is_none() {
                errors.push(ConfigError {
                    field: format!("duty[{i}].mode"),
                    message: format!(
                        "must be \"charge\", \"discharge\", or \"idle\", got \"{}\"",
                        phase.mode
                    ),
                });
            }
            if !(phase.power_mw >= 0.0) {
                errors.push(ConfigError {
                    field: format!("duty[{i}].power_mw"),
                    message: "must be >= 0".into(),
                });
            }
            if !(phase.duration_min > 0.0) {
                errors.push(ConfigError {
                    field: format!("duty[{i}].duration_min"),
                    message: "must be > 0".into(),
                });
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_preset_valid() {
        let cfg = ScenarioConfig::baseline();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "baseline should be valid: {errors:?}");
    }

    #[test]
    fn all_presets_are_valid() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn from_preset_unknown() {
        let err = ScenarioConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[simulation]
dt_min = 5.0
steps = 288

[storage]
variant = "general"
capacity_mwh = 12.0
charge_rate_max_mw = 6.0
discharge_rate_max_mw = 8.0
round_trip_eff_pct = 92.0
tau_min = 15.0
init_charge_frac = 0.5

[[duty]]
mode = "discharge"
power_mw = 8.0
duration_min = 120.0
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.simulation.steps), Some(288));
        assert_eq!(cfg.as_ref().map(|c| &*c.storage.variant), Some("general"));
        assert_eq!(cfg.as_ref().map(|c| c.duty.len()), Some(1));
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[storage]
capacity_mwh = 10.0
bogus_field = true
"#;
        let result = ScenarioConfig::from_toml_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[storage]
capacity_mwh = 12.0
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok());
        let cfg = cfg.ok();
        // capacity overridden
        assert_eq!(cfg.as_ref().map(|c| c.storage.capacity_mwh), Some(12.0));
        // efficiency and timestep kept default
        assert_eq!(cfg.as_ref().map(|c| c.storage.round_trip_eff_pct), Some(85.0));
        assert_eq!(cfg.as_ref().map(|c| c.simulation.dt_min), Some(1.0));
        // empty [[duty]] section means an all-idle run
        assert_eq!(cfg.as_ref().map(|c| c.duty.len()), Some(0));
    }

    #[test]
    fn validation_catches_zero_timestep() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.simulation.dt_min = 0.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "simulation.dt_min"));
    }

    #[test]
    fn validation_catches_bad_variant() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.storage.variant = "flywheel".to_string();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "storage.variant"));
    }

    #[test]
    fn validation_catches_bad_efficiency() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.storage.round_trip_eff_pct = 101.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "storage.round_trip_eff_pct"));
    }

    #[test]
    fn validation_catches_bad_initial_charge() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.storage.init_charge_frac = 1.5;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "storage.init_charge_frac"));
    }

    #[test]
    fn validation_only_checks_rates_for_selected_variant() {
        // battery: the unused general caps may be anything
        let mut cfg = ScenarioConfig::baseline();
        cfg.storage.charge_rate_max_mw = 0.0;
        assert!(cfg.validate().is_empty());

        // general: the symmetric rating is ignored instead
        let mut cfg = ScenarioConfig::asymmetric();
        cfg.storage.rate_max_mw = 0.0;
        assert!(cfg.validate().is_empty());

        let mut cfg = ScenarioConfig::asymmetric();
        cfg.storage.discharge_rate_max_mw = -1.0;
        let errors = cfg.validate();
        assert!(
            errors
                .iter()
                .any(|e| e.field == "storage.discharge_rate_max_mw")
        );
    }

    #[test]
    fn validation_catches_bad_duty_phase() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.duty[1].mode = "coast".to_string();
        cfg.duty[2].duration_min = 0.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "duty[1].mode"));
        assert!(errors.iter().any(|e| e.field == "duty[2].duration_min"));
    }

    #[test]
    fn deep_discharge_starts_full() {
        let cfg = ScenarioConfig::deep_discharge();
        assert_eq!(cfg.storage.init_charge_frac, 1.0);
        assert_eq!(cfg.duty.len(), 1);
        assert_eq!(cfg.duty[0].mode, "discharge");
    }

    #[test]
    fn asymmetric_uses_general_variant() {
        let cfg = ScenarioConfig::asymmetric();
        assert_eq!(cfg.storage.variant, "general");
        assert!(cfg.storage.discharge_rate_max_mw > cfg.storage.charge_rate_max_mw);
    }
}
