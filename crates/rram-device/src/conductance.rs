//! Gap-dependent conduction law and its inverse.
//!
//! I = I0 * exp(-gap / g0) * sinh(V / V0)
//! V = V0 * asinh(I / I0 * exp(gap / g0))

use rram_core::{saturate, scaled_asinh, scaled_sinh};

use crate::params::DeviceParams;

/// Terminal current for a given gap and voltage.
#[inline]
pub fn current_from_voltage(params: &DeviceParams, gap: f64, voltage: f64) -> f64 {
    saturate(params.i0 * scaled_sinh(-gap / params.g0, voltage / params.v0))
}

/// Terminal voltage for a given gap and current (exact inverse of
/// [`current_from_voltage`]).
#[inline]
pub fn voltage_from_current(params: &DeviceParams, gap: f64, current: f64) -> f64 {
    params.v0 * scaled_asinh(current / params.i0, gap / params.g0)
}

/// Resolved terminal operating point of a voltage-driven step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperatingPoint {
    pub voltage: f64,
    pub current: f64,
    /// Whether the series limit clipped the current.
    pub limited: bool,
}

/// Apply `voltage`, then clip the current to `+-current_limit`.
///
/// When clipped, the voltage is re-derived from the clipped current so the
/// operating point stays on the conduction law.
pub fn limit_current(params: &DeviceParams, gap: f64, voltage: f64) -> OperatingPoint {
    let current = current_from_voltage(params, gap, voltage);
    if current.abs() > params.current_limit {
        let current = params.current_limit.copysign(current);
        OperatingPoint {
            voltage: voltage_from_current(params, gap, current),
            current,
            limited: true,
        }
    } else {
        OperatingPoint {
            voltage,
            current,
            limited: false,
        }
    }
}
