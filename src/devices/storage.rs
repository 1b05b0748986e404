//! General energy storage device model.
//!
//! Internally all stored energy is tracked in MW·min (power × minutes), so
//! per-step arithmetic stays in power × time-in-minutes without fractional
//! hour conversions; 1 MWh = 60 MW·min.

use std::fmt;

use tracing::debug;

/// Tolerance for the post-update charge bounds check (MW·min).
///
/// Overshoot within this band clamps onto the bound; anything beyond it is a
/// [`StorageError::StateBoundsViolation`].
const CHARGE_TOLERANCE_MW_MIN: f64 = 1e-6;

/// Errors raised by storage device construction and per-step operations.
///
/// None of these are retried internally; the caller decides whether to retry
/// with smaller commands or abort the run.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageError {
    /// Construction rejected a physical parameter.
    InvalidConfiguration {
        /// Offending parameter name.
        field: &'static str,
        /// Human-readable constraint description.
        message: String,
    },
    /// A query or update was called with a non-positive timestep.
    InvalidTimestep {
        /// The rejected timestep (minutes).
        dt_min: f64,
    },
    /// An update was called with a negative commanded flow.
    InvalidCommand {
        /// Offending argument name.
        field: &'static str,
        /// The rejected power value (MW).
        value_mw: f64,
    },
    /// An update would push the charge outside its physical bounds, meaning
    /// the commanded flows exceeded previously reported availability.
    StateBoundsViolation {
        /// Charge the update would have produced (MW·min).
        attempted_mw_min: f64,
        /// Lower charge bound (MW·min).
        min_mw_min: f64,
        /// Upper charge bound (MW·min).
        max_mw_min: f64,
    },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfiguration { field, message } => {
                write!(f, "invalid storage configuration: {field} — {message}")
            }
            Self::InvalidTimestep { dt_min } => {
                write!(f, "timestep must be > 0 minutes, got {dt_min}")
            }
            Self::InvalidCommand { field, value_mw } => {
                write!(f, "commanded flow {field} must be >= 0 MW, got {value_mw}")
            }
            Self::StateBoundsViolation {
                attempted_mw_min,
                min_mw_min,
                max_mw_min,
            } => write!(
                f,
                "update would move charge to {attempted_mw_min} MW·min, \
                 outside [{min_mw_min}, {max_mw_min}] — commands exceeded \
                 reported availability"
            ),
        }
    }
}

impl std::error::Error for StorageError {}

/// A grid-connected energy storage device.
///
/// Holds immutable physical configuration and the mutable charge state, and
/// exposes the per-timestep protocol the dispatching caller must follow:
/// query [`charge_rate_avail_mw`](Self::charge_rate_avail_mw) and/or
/// [`discharge_rate_avail_mw`](Self::discharge_rate_avail_mw) first, then
/// commit flows no larger than the reported availability via
/// [`update`](Self::update). There is exactly one operating mode, with no
/// fault or offline states.
///
/// # Examples
///
/// ```
/// use bess_sim::devices::StorageDevice;
///
/// let mut dev = StorageDevice::new(30.0, 30.0, 30.0, 85.0, 30.0, 0.0, 2067.0, 35.6)?;
/// assert_eq!(dev.charge_max_mw_min(), 1800.0);
///
/// let avail = dev.charge_rate_avail_mw(1.0)?;
/// dev.update(1.0, avail, 0.0)?;
/// assert!(dev.charge_mw_min() > 0.0);
/// # Ok::<(), bess_sim::devices::StorageError>(())
/// ```
#[derive(Debug, Clone)]
pub struct StorageDevice {
    /// Storage capacity (MWh).
    pub capacity_mwh: f64,
    /// Maximum charging power (MW).
    pub charge_rate_max_mw: f64,
    /// Maximum discharging power (MW).
    pub discharge_rate_max_mw: f64,
    /// Round-trip efficiency (percent, applied on the charge leg only).
    pub round_trip_eff_pct: f64,
    /// Time constant throttling discharge availability near empty (minutes).
    pub tau_min: f64,
    /// Installation cost ($/kW). Carried for the study driver, never read here.
    pub cost_install_per_kw: f64,
    /// Fixed O&M cost ($/kW/yr). Carried for the study driver, never read here.
    pub cost_om_fix_per_kw_yr: f64,

    // Derived charge bounds (MW·min), fixed for the device lifetime.
    charge_min_mw_min: f64,
    charge_max_mw_min: f64,

    // Stored energy (MW·min). Kept within bounds by `update`.
    charge_mw_min: f64,

    /// Commanded charging power from the latest update (MW).
    pub charge_rate_mw: f64,
    /// Commanded discharging power from the latest update (MW).
    pub discharge_rate_mw: f64,
    /// Post-efficiency stored rate from the latest update (MW).
    pub increase_mw: f64,
    /// Released rate from the latest update (MW, no loss applied).
    pub decrease_mw: f64,
    /// Observed rate of change of stored energy over the latest update (MW).
    pub ramp_mw: f64,
}

impl StorageDevice {
    /// Creates a storage device from its physical parameters.
    ///
    /// # Arguments
    ///
    /// * `capacity_mwh` - Storage capacity in MWh (must be > 0)
    /// * `charge_rate_max_mw` - Maximum charging power in MW (must be > 0)
    /// * `discharge_rate_max_mw` - Maximum discharging power in MW (must be > 0)
    /// * `round_trip_eff_pct` - Round-trip efficiency in percent, (0, 100]
    /// * `tau_min` - Discharge throttle time constant in minutes (must be > 0)
    /// * `init_charge_frac` - Initial charge as a fraction of capacity, [0, 1]
    /// * `cost_install_per_kw` - Installation cost, carried but not consumed
    /// * `cost_om_fix_per_kw_yr` - Fixed O&M cost, carried but not consumed
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidConfiguration`] naming the first
    /// parameter that violates its constraint.
    #[expect(clippy::too_many_arguments)]
    pub fn new(
        capacity_mwh: f64,
        charge_rate_max_mw: f64,
        discharge_rate_max_mw: f64,
        round_trip_eff_pct: f64,
        tau_min: f64,
        init_charge_frac: f64,
        cost_install_per_kw: f64,
        cost_om_fix_per_kw_yr: f64,
    ) -> Result<Self, StorageError> {
        if !(capacity_mwh > 0.0) {
            return Err(StorageError::InvalidConfiguration {
                field: "capacity_mwh",
                message: format!("must be > 0, got {capacity_mwh}"),
            });
        }
        if !(charge_rate_max_mw > 0.0) {
            return Err(StorageError::InvalidConfiguration {
                field: "charge_rate_max_mw",
                message: format!("must be > 0, got {charge_rate_max_mw}"),
            });
        }
        if !(discharge_rate_max_mw > 0.0) {
            return Err(StorageError::InvalidConfiguration {
                field: "discharge_rate_max_mw",
                message: format!("must be > 0, got {discharge_rate_max_mw}"),
            });
        }
        if !(round_trip_eff_pct > 0.0 && round_trip_eff_pct <= 100.0) {
            return Err(StorageError::InvalidConfiguration {
                field: "round_trip_eff_pct",
                message: format!("must be in (0, 100], got {round_trip_eff_pct}"),
            });
        }
        if !(tau_min > 0.0) {
            return Err(StorageError::InvalidConfiguration {
                field: "tau_min",
                message: format!("must be > 0, got {tau_min}"),
            });
        }
        if !(0.0..=1.0).contains(&init_charge_frac) {
            return Err(StorageError::InvalidConfiguration {
                field: "init_charge_frac",
                message: format!("must be in [0, 1], got {init_charge_frac}"),
            });
        }

        let charge_max_mw_min = capacity_mwh * 60.0;
        Ok(Self {
            capacity_mwh,
            charge_rate_max_mw,
            discharge_rate_max_mw,
            round_trip_eff_pct,
            tau_min,
            cost_install_per_kw,
            cost_om_fix_per_kw_yr,
            charge_min_mw_min: 0.0,
            charge_max_mw_min,
            charge_mw_min: init_charge_frac * charge_max_mw_min,
            charge_rate_mw: 0.0,
            discharge_rate_mw: 0.0,
            increase_mw: 0.0,
            decrease_mw: 0.0,
            ramp_mw: 0.0,
        })
    }

    /// Stored energy (MW·min).
    pub fn charge_mw_min(&self) -> f64 {
        self.charge_mw_min
    }

    /// Lower charge bound (MW·min).
    pub fn charge_min_mw_min(&self) -> f64 {
        self.charge_min_mw_min
    }

    /// Upper charge bound (MW·min), `capacity_mwh * 60`.
    pub fn charge_max_mw_min(&self) -> f64 {
        self.charge_max_mw_min
    }

    /// State of charge as a fraction of capacity (0.0 to 1.0).
    pub fn soc(&self) -> f64 {
        self.charge_mw_min / self.charge_max_mw_min
    }

    /// Maximum charging power (MW) obtainable over the next `dt_min` minutes
    /// without exceeding the upper charge bound.
    ///
    /// Pure function of the current state; no side effects.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidTimestep`] when `dt_min` is not > 0.
    pub fn charge_rate_avail_mw(&self, dt_min: f64) -> Result<f64, StorageError> {
        if !(dt_min > 0.0) {
            return Err(StorageError::InvalidTimestep { dt_min });
        }

        let avail = if self.charge_mw_min < self.charge_max_mw_min {
            ((self.charge_max_mw_min - self.charge_mw_min) / dt_min).min(self.charge_rate_max_mw)
        } else {
            0.0
        };
        debug!(charge_rate_avail_mw = avail, dt_min, "charge availability");
        Ok(avail)
    }

    /// Maximum discharging power (MW) obtainable over the next `dt_min`
    /// minutes without going below the lower charge bound, attenuated by the
    /// time constant `tau_min`.
    ///
    /// The division by tau is a soft throttle: usable discharge tapers as the
    /// device approaches empty, even when the raw headroom over the interval
    /// would allow more. It is distinct from a response-time ramp limit.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidTimestep`] when `dt_min` is not > 0.
    pub fn discharge_rate_avail_mw(&self, dt_min: f64) -> Result<f64, StorageError> {
        if !(dt_min > 0.0) {
            return Err(StorageError::InvalidTimestep { dt_min });
        }

        let avail = if self.charge_mw_min > self.charge_min_mw_min {
            ((self.charge_mw_min - self.charge_min_mw_min) / dt_min / self.tau_min)
                .min(self.discharge_rate_max_mw)
        } else {
            0.0
        };
        debug!(discharge_rate_avail_mw = avail, dt_min, "discharge availability");
        Ok(avail)
    }

    /// Applies one timestep of commanded flows and advances the charge state.
    ///
    /// Efficiency loss applies only to the charging leg: the stored rate is
    /// `increase_mw * round_trip_eff_pct / 100`, while `decrease_mw` leaves
    /// the device without loss. The resulting charge must stay within the
    /// physical bounds; the caller guarantees this by clamping its commands
    /// to the availability queries beforehand.
    ///
    /// On success the diagnostic fields (`charge_rate_mw`,
    /// `discharge_rate_mw`, `increase_mw`, `decrease_mw`, `ramp_mw`) describe
    /// this step. On error the device state (charge and diagnostics) is
    /// left completely untouched.
    ///
    /// # Errors
    ///
    /// * [`StorageError::InvalidTimestep`] when `dt_min` is not > 0
    /// * [`StorageError::InvalidCommand`] when either flow is negative
    /// * [`StorageError::StateBoundsViolation`] when the resulting charge
    ///   would leave its bounds beyond the floating-point tolerance
    pub fn update(
        &mut self,
        dt_min: f64,
        increase_mw: f64,
        decrease_mw: f64,
    ) -> Result<(), StorageError> {
        if !(dt_min > 0.0) {
            return Err(StorageError::InvalidTimestep { dt_min });
        }
        if !(increase_mw >= 0.0) {
            return Err(StorageError::InvalidCommand {
                field: "increase_mw",
                value_mw: increase_mw,
            });
        }
        if !(decrease_mw >= 0.0) {
            return Err(StorageError::InvalidCommand {
                field: "decrease_mw",
                value_mw: decrease_mw,
            });
        }

        let charge_old = self.charge_mw_min;
        let stored_increase_mw = increase_mw * self.round_trip_eff_pct / 100.0;
        let next = charge_old + stored_increase_mw * dt_min - decrease_mw * dt_min;

        if next < self.charge_min_mw_min - CHARGE_TOLERANCE_MW_MIN
            || next > self.charge_max_mw_min + CHARGE_TOLERANCE_MW_MIN
        {
            return Err(StorageError::StateBoundsViolation {
                attempted_mw_min: next,
                min_mw_min: self.charge_min_mw_min,
                max_mw_min: self.charge_max_mw_min,
            });
        }

        self.charge_rate_mw = increase_mw;
        self.discharge_rate_mw = decrease_mw;
        self.increase_mw = stored_increase_mw;
        self.decrease_mw = decrease_mw;
        self.charge_mw_min = next.clamp(self.charge_min_mw_min, self.charge_max_mw_min);
        self.ramp_mw = (self.charge_mw_min - charge_old) / dt_min;

        debug!(
            charge_mw_min = self.charge_mw_min,
            ramp_mw = self.ramp_mw,
            "storage update"
        );
        Ok(())
    }
}
