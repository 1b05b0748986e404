//! Declared duty schedule: time-ordered commanded flows.
//!
//! A duty cycle is not a dispatch policy. It is a fixed, declared sequence of
//! commanded charge/discharge phases the engine executes, clamping each
//! command to the device's reported availability.

/// What a duty phase asks the device to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DutyMode {
    /// Command charging power.
    Charge,
    /// Command discharging power.
    Discharge,
    /// Command nothing; the device holds its charge.
    Idle,
}

impl DutyMode {
    /// Parses the scenario-file spelling of a mode.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "charge" => Some(Self::Charge),
            "discharge" => Some(Self::Discharge),
            "idle" => Some(Self::Idle),
            _ => None,
        }
    }
}

/// One contiguous span of the duty schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct DutyPhase {
    /// What to command during this span.
    pub mode: DutyMode,
    /// Commanded power magnitude (MW). Ignored for [`DutyMode::Idle`].
    pub power_mw: f64,
    /// Span length (minutes).
    pub duration_min: f64,
}

/// A time-ordered list of duty phases.
///
/// Phases occupy half-open time spans `[start, end)` laid back to back from
/// t = 0; past the last phase the command is zero in both directions.
#[derive(Debug, Clone, Default)]
pub struct DutyCycle {
    phases: Vec<DutyPhase>,
}

impl DutyCycle {
    /// Creates a duty cycle from phases in schedule order.
    pub fn new(phases: Vec<DutyPhase>) -> Self {
        Self { phases }
    }

    /// The phases in schedule order.
    pub fn phases(&self) -> &[DutyPhase] {
        &self.phases
    }

    /// Total scheduled duration (minutes).
    pub fn total_duration_min(&self) -> f64 {
        self.phases.iter().map(|p| p.duration_min).sum()
    }

    /// Commanded `(charge_mw, discharge_mw)` at the given simulation time.
    ///
    /// Pure lookup; times beyond the schedule return `(0.0, 0.0)`.
    pub fn command_at_min(&self, time_min: f64) -> (f64, f64) {
        let mut phase_start = 0.0;
        for phase in &self.phases {
            let phase_end = phase_start + phase.duration_min;
            if time_min >= phase_start && time_min < phase_end {
                return match phase.mode {
                    DutyMode::Charge => (phase.power_mw, 0.0),
                    DutyMode::Discharge => (0.0, phase.power_mw),
                    DutyMode::Idle => (0.0, 0.0),
                };
            }
            phase_start = phase_end;
        }
        (0.0, 0.0)
    }
}
