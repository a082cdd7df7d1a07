//! Joule heating, field enhancement and gap growth kinetics.

use rand::Rng;
use rand_distr::StandardNormal;
use rram_core::units::constants::NANOMETER_M;
use rram_core::{saturate, saturating_exp, scaled_sinh};

use crate::params::{DeviceParams, Variability};

/// Device temperature from Joule heating: `T = T0 + |V * I * Rth|`.
#[inline]
pub fn temperature(params: &DeviceParams, voltage: f64, current: f64) -> f64 {
    params.t_ini + (voltage * current * params.rth).abs()
}

/// Field-enhancement factor for the present gap and bias.
///
/// Zero when the enhanced field `|gamma * V| / tox` is below `f_min`.
pub fn gamma(params: &DeviceParams, gap: f64, voltage: f64) -> f64 {
    let base = if voltage < 0.0 {
        params.gamma0_negative
    } else {
        params.gamma0
    };
    let gamma = base - params.beta * (gap / NANOMETER_M).powf(params.alpha);
    if (gamma * voltage).abs() / params.tox < params.f_min {
        0.0
    } else {
        gamma
    }
}

/// Deterministic gap rate (m/s).
///
/// `-vel0 * exp(-q Ea / kT) * sinh(gamma a0 / tox * q V / kT)`, evaluated so
/// that Arrhenius underflow and sinh overflow saturate instead of producing
/// NaN.
pub fn gap_rate(params: &DeviceParams, temperature: f64, gamma: f64, voltage: f64) -> f64 {
    if gamma == 0.0 || voltage == 0.0 {
        return 0.0;
    }
    let kt = params.thermal_energy_j(temperature);
    let arrhenius = -params.activation_energy_j() / kt;
    let field = gamma * params.a0 / params.tox * params.q * voltage / kt;
    saturate(-params.vel0 * scaled_sinh(arrhenius, field))
}

/// Logistic gate that suppresses variability away from `t_crit`.
#[inline]
pub fn variability_gate(params: &DeviceParams, temperature: f64) -> f64 {
    1.0 / (1.0 + saturating_exp((params.t_crit - temperature) / params.t_smth))
}

/// Stochastic gap rate (m/s); exactly zero at zero bias or with variability
/// disabled, in which case no sample is drawn.
pub fn variability_rate<R>(params: &DeviceParams, temperature: f64, voltage: f64, rng: &mut R) -> f64
where
    R: Rng + ?Sized,
{
    if voltage.abs() > 0.0 && params.variability == Variability::Enabled {
        let z: f64 = rng.sample(StandardNormal);
        z * params.delta_gap0 * variability_gate(params, temperature)
    } else {
        0.0
    }
}
