//! Storage simulator entry point — CLI wiring and config-driven runs.

use std::path::Path;
use std::process;

use bess_sim::config::{ConfigError, DutyPhaseConfig, ScenarioConfig, StorageConfig};
use bess_sim::devices::{BatterySpec, StorageDevice, StorageError};
use bess_sim::io::export::export_csv;
use bess_sim::sim::duty::{DutyCycle, DutyMode, DutyPhase};
use bess_sim::sim::engine::Engine;
use bess_sim::sim::report::SummaryReport;
use bess_sim::sim::types::SimConfig;

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    preset: Option<String>,
    telemetry_out: Option<String>,
}

fn print_help() {
    eprintln!("bess-sim — grid-scale battery energy storage simulator");
    eprintln!();
    eprintln!("Usage: bess-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>        Run the scenario described by a TOML file");
    eprintln!("  --preset <name>          Run a built-in scenario preset");
    eprintln!("  --telemetry-out <path>   Write per-step telemetry rows to a CSV file");
    eprintln!("  --help                   Print this message");
    eprintln!();
    eprintln!("Presets: {}", ScenarioConfig::PRESETS.join(", "));
    eprintln!("Without --scenario or --preset the baseline preset runs.");
    eprintln!("Set RUST_LOG (e.g. RUST_LOG=debug) for per-step device tracing.");
}

/// Reads the next flag value or exits with a usage error.
fn take_value(args: &[String], i: &mut usize, flag: &str) -> String {
    *i += 1;
    match args.get(*i) {
        Some(v) => v.clone(),
        None => {
            eprintln!("error: {flag} requires a value");
            process::exit(1);
        }
    }
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        telemetry_out: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--scenario" => cli.scenario_path = Some(take_value(&args, &mut i, "--scenario")),
            "--preset" => cli.preset = Some(take_value(&args, &mut i, "--preset")),
            "--telemetry-out" => {
                cli.telemetry_out = Some(take_value(&args, &mut i, "--telemetry-out"));
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

/// Resolves the scenario: `--scenario` wins, then `--preset`, then baseline.
fn load_scenario(cli: &CliArgs) -> Result<ScenarioConfig, ConfigError> {
    if let Some(ref path) = cli.scenario_path {
        ScenarioConfig::from_toml_file(Path::new(path))
    } else if let Some(ref name) = cli.preset {
        ScenarioConfig::from_preset(name)
    } else {
        Ok(ScenarioConfig::baseline())
    }
}

/// Builds the storage device selected by the scenario's variant.
fn build_device(cfg: &StorageConfig) -> Result<StorageDevice, StorageError> {
    match cfg.variant.as_str() {
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
    }
}

/// Builds the duty cycle from validated phase configs.
fn build_duty(phases: &[DutyPhaseConfig]) -> DutyCycle {
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

fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = parse_args();

    let scenario = match load_scenario(&cli) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let device = match build_device(&scenario.storage) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };
    let sim_config = SimConfig::new(scenario.simulation.dt_min, scenario.simulation.steps);
    let duty = build_duty(&scenario.duty);

    let mut engine = Engine::new(sim_config.clone(), device, duty);
    let results = match engine.run() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: simulation aborted: {e}");
            process::exit(1);
        }
    };

    for r in &results {
        println!("{r}");
    }

    let report =
        SummaryReport::from_results(&results, sim_config.dt_min, scenario.storage.capacity_mwh);
    println!("\n{report}");

    if let Some(ref path) = cli.telemetry_out {
        if let Err(e) = export_csv(&results, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Telemetry written to {path}");
    }
}
