//! Device parameter bundle.
//!
//! Defaults are the published model-card values. Parameters are taken as
//! given; [`DeviceParams::validate`] is an opt-in sanity check.

use rram_core::units::constants::{KB_J_PER_K, Q_C, ROOM_TEMPERATURE_K};
use rram_core::units::{Current, Length, Temperature, Time};
use rram_core::{current_a, ensure_finite, length_m, temperature_k, time_s};
use serde::{Deserialize, Serialize};

use crate::error::{DeviceError, DeviceResult};

/// Cycle-to-cycle gap variability switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variability {
    /// Deterministic gap evolution.
    #[default]
    Disabled,
    /// Gaussian gap-rate noise gated by temperature.
    Enabled,
}

impl From<bool> for Variability {
    fn from(enabled: bool) -> Self {
        if enabled { Self::Enabled } else { Self::Disabled }
    }
}

/// How the gap rate is integrated over one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapIntegration {
    /// `gap += rate * dt`
    #[default]
    ForwardEuler,
    /// `gap += (previous_rate + rate) / 2 * dt`
    Trapezoidal,
}

/// Physical and fitting constants of one device.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceParams {
    /// Boltzmann constant (J/K)
    pub kb: f64,
    /// Electron charge (C)
    pub q: f64,

    /// Activation energy (eV)
    pub ea: f64,
    /// Minimum field for gap motion (V/m)
    pub f_min: f64,
    /// Atomic spacing (m)
    pub a0: f64,
    /// Oxide thickness (m)
    pub tox: f64,
    /// Ambient / initial device temperature (K)
    pub t_ini: f64,
    /// Thermal resistance (K/W)
    pub rth: f64,

    /// Current level (A)
    pub i0: f64,
    /// Resistance window (m)
    pub g0: f64,
    /// I-V nonlinearity (V)
    pub v0: f64,

    /// Initial gap (m)
    pub gap_ini: f64,
    /// Lower gap bound (m)
    pub gap_min: f64,
    /// Upper gap bound (m)
    pub gap_max: f64,

    /// Gap velocity prefactor (m/s)
    pub vel0: f64,
    pub alpha: f64,
    pub beta: f64,
    /// Gamma base for non-negative bias
    pub gamma0: f64,
    /// Gamma base for negative bias
    pub gamma0_negative: f64,

    /// Gap fluctuation amplitude
    pub delta_gap0: f64,
    /// Critical temperature of the variability gate (K)
    pub t_crit: f64,
    /// Smoothing temperature of the variability gate (K)
    pub t_smth: f64,

    /// Series current limit (A)
    pub current_limit: f64,
    pub variability: Variability,
    pub integration: GapIntegration,
    /// Fixed integration step (s)
    pub time_step: f64,
}

impl Default for DeviceParams {
    fn default() -> Self {
        Self {
            kb: KB_J_PER_K,
            q: Q_C,
            ea: 0.6,
            f_min: 1.4e9,
            a0: 0.25e-9,
            tox: 12e-9,
            t_ini: ROOM_TEMPERATURE_K,
            rth: 2.1e3,
            i0: 1000e-6,
            g0: 0.25e-9,
            v0: 0.25,
            gap_ini: 2e-10,
            gap_min: 2e-10,
            gap_max: 17e-10,
            vel0: 10.0,
            alpha: 3.0,
            beta: 0.8,
            gamma0: 16.0,
            gamma0_negative: 16.0,
            delta_gap0: 0.02,
            t_crit: 450.0,
            t_smth: 500.0,
            current_limit: 1.0,
            variability: Variability::Disabled,
            integration: GapIntegration::ForwardEuler,
            time_step: 1e-9,
        }
    }
}

impl DeviceParams {
    pub fn with_gap_ini(mut self, gap: Length) -> Self {
        self.gap_ini = length_m(gap);
        self
    }

    pub fn with_gap_bounds(mut self, min: Length, max: Length) -> Self {
        self.gap_min = length_m(min);
        self.gap_max = length_m(max);
        self
    }

    pub fn with_ambient(mut self, t: Temperature) -> Self {
        self.t_ini = temperature_k(t);
        self
    }

    pub fn with_time_step(mut self, dt: Time) -> Self {
        self.time_step = time_s(dt);
        self
    }

    pub fn with_current_limit(mut self, limit: Current) -> Self {
        self.current_limit = current_a(limit);
        self
    }

    pub fn with_variability(mut self, variability: Variability) -> Self {
        self.variability = variability;
        self
    }

    pub fn with_integration(mut self, integration: GapIntegration) -> Self {
        self.integration = integration;
        self
    }

    /// Activation energy in joules.
    #[inline]
    pub fn activation_energy_j(&self) -> f64 {
        self.q * self.ea
    }

    /// `kb * T` in joules.
    #[inline]
    pub fn thermal_energy_j(&self, temperature: f64) -> f64 {
        self.kb * temperature
    }

    /// Check that the bundle describes a physically usable device.
    ///
    /// Construction never calls this; callers that accept parameters from
    /// outside (files, command lines) should.
    pub fn validate(&self) -> DeviceResult<()> {
        let fields = [
            (self.kb, "kb"),
            (self.q, "q"),
            (self.ea, "ea"),
            (self.f_min, "f_min"),
            (self.a0, "a0"),
            (self.tox, "tox"),
            (self.t_ini, "t_ini"),
            (self.rth, "rth"),
            (self.i0, "i0"),
            (self.g0, "g0"),
            (self.v0, "v0"),
            (self.gap_ini, "gap_ini"),
            (self.gap_min, "gap_min"),
            (self.gap_max, "gap_max"),
            (self.vel0, "vel0"),
            (self.alpha, "alpha"),
            (self.beta, "beta"),
            (self.gamma0, "gamma0"),
            (self.gamma0_negative, "gamma0_negative"),
            (self.delta_gap0, "delta_gap0"),
            (self.t_crit, "t_crit"),
            (self.t_smth, "t_smth"),
            (self.current_limit, "current_limit"),
            (self.time_step, "time_step"),
        ];
        for (value, what) in fields {
            ensure_finite(value, what)?;
        }

        let positive = [
            (self.kb, "kb must be positive"),
            (self.q, "q must be positive"),
            (self.tox, "tox must be positive"),
            (self.t_ini, "t_ini must be positive"),
            (self.i0, "i0 must be positive"),
            (self.g0, "g0 must be positive"),
            (self.v0, "v0 must be positive"),
            (self.t_smth, "t_smth must be positive"),
            (self.current_limit, "current_limit must be positive"),
            (self.time_step, "time_step must be positive"),
        ];
        for (value, what) in positive {
            if value <= 0.0 {
                return Err(DeviceError::InvalidParam { what });
            }
        }

        if self.rth < 0.0 {
            return Err(DeviceError::InvalidParam {
                what: "rth must be non-negative",
            });
        }
        if self.gap_min > self.gap_max {
            return Err(DeviceError::InvalidParam {
                what: "gap_min must not exceed gap_max",
            });
        }
        if self.gap_ini < self.gap_min || self.gap_ini > self.gap_max {
            return Err(DeviceError::InvalidParam {
                what: "gap_ini must lie within [gap_min, gap_max]",
            });
        }
        Ok(())
    }
}
