//! Pure single-step update.
//!
//! Order within a step: terminal operating point -> temperature -> gamma ->
//! gap. Every quantity is computed from the previous state's gap; the new gap
//! is the last thing written.

use rand::Rng;
use tracing::trace;

use crate::conductance::{limit_current, voltage_from_current};
use crate::excitation::Excitation;
use crate::kinetics;
use crate::params::{DeviceParams, GapIntegration};
use crate::state::DeviceState;

/// Advance `prev` by one fixed time step under `input`.
///
/// `input` is volts or amperes depending on `excitation` and must be finite.
/// `rng` is consumed only when the variability branch is active.
pub fn advance<R>(
    params: &DeviceParams,
    prev: &DeviceState,
    input: f64,
    excitation: Excitation,
    rng: &mut R,
) -> DeviceState
where
    R: Rng + ?Sized,
{
    let (terminal_voltage, terminal_current) = match excitation {
        Excitation::Voltage => {
            let op = limit_current(params, prev.gap, input);
            if op.limited {
                trace!(
                    applied = input,
                    voltage = op.voltage,
                    current = op.current,
                    "current limit active"
                );
            }
            (op.voltage, op.current)
        }
        Excitation::Current => (voltage_from_current(params, prev.gap, input), input),
    };

    let temperature = kinetics::temperature(params, terminal_voltage, terminal_current);
    let gamma = kinetics::gamma(params, prev.gap, terminal_voltage);

    let gap_rate = kinetics::gap_rate(params, temperature, gamma, terminal_voltage);
    let noise = kinetics::variability_rate(params, temperature, terminal_voltage, rng);
    let total_rate = gap_rate + noise;

    let increment = match params.integration {
        GapIntegration::ForwardEuler => total_rate * params.time_step,
        GapIntegration::Trapezoidal => {
            (0.5 * prev.total_rate + 0.5 * total_rate) * params.time_step
        }
    };

    DeviceState {
        terminal_voltage,
        terminal_current,
        temperature,
        gap: clamp_gap(params, prev.gap + increment),
        gap_rate,
        gamma,
        total_rate,
    }
}

#[inline]
fn clamp_gap(params: &DeviceParams, gap: f64) -> f64 {
    if gap < params.gap_min {
        params.gap_min
    } else if gap > params.gap_max {
        params.gap_max
    } else {
        gap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conductance::current_from_voltage;
    use crate::params::Variability;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0)
    }

    #[test]
    fn zero_voltage_leaves_state_at_rest() {
        let p = DeviceParams::default();
        let s0 = DeviceState::initial(&p);
        let s1 = advance(&p, &s0, 0.0, Excitation::Voltage, &mut rng());
        assert_eq!(s1.gap, p.gap_ini);
        assert_eq!(s1.terminal_current, 0.0);
        assert_eq!(s1.temperature, p.t_ini);
        assert_eq!(s1.gamma, 0.0);
    }

    #[test]
    fn voltage_drive_uses_previous_gap() {
        let p = DeviceParams {
            gap_ini: 1.7e-9,
            ..Default::default()
        };
        let s0 = DeviceState::initial(&p);
        let s1 = advance(&p, &s0, 1.4, Excitation::Voltage, &mut rng());
        assert_eq!(s1.terminal_voltage, 1.4);
        assert_eq!(s1.terminal_current, current_from_voltage(&p, 1.7e-9, 1.4));
        assert!(s1.gamma > 0.0);
        assert!(s1.gap_rate < 0.0);
        assert!(s1.gap < s0.gap);
    }

    #[test]
    fn current_drive_derives_voltage() {
        let p = DeviceParams::default();
        let s0 = DeviceState::initial(&p);
        let s1 = advance(&p, &s0, -0.02, Excitation::Current, &mut rng());
        assert_eq!(s1.terminal_current, -0.02);
        assert!(s1.terminal_voltage < 0.0);
        assert_eq!(
            s1.terminal_voltage,
            voltage_from_current(&p, p.gap_ini, -0.02)
        );
    }

    #[test]
    fn current_drive_is_not_limited() {
        let p = DeviceParams {
            current_limit: 1e-6,
            ..Default::default()
        };
        let s0 = DeviceState::initial(&p);
        let s1 = advance(&p, &s0, 1e-3, Excitation::Current, &mut rng());
        assert_eq!(s1.terminal_current, 1e-3);
    }

    #[test]
    fn current_limit_is_exact() {
        let p = DeviceParams {
            current_limit: 1e-4,
            ..Default::default()
        };
        let s0 = DeviceState::initial(&p);
        for v in [1.5, -1.5] {
            let s1 = advance(&p, &s0, v, Excitation::Voltage, &mut rng());
            assert_eq!(s1.terminal_current.abs(), p.current_limit);
            assert_eq!(
                s1.terminal_voltage,
                voltage_from_current(&p, s0.gap, s1.terminal_current)
            );
        }
    }

    #[test]
    fn gap_is_clamped_at_bounds() {
        let p = DeviceParams {
            gap_ini: 1.0e-9,
            time_step: 1.0,
            ..Default::default()
        };
        let s0 = DeviceState::initial(&p);
        let set = advance(&p, &s0, 1.5, Excitation::Voltage, &mut rng());
        assert_eq!(set.gap, p.gap_min);
        let reset = advance(&p, &s0, -1.5, Excitation::Voltage, &mut rng());
        assert_eq!(reset.gap, p.gap_max);
    }

    #[test]
    fn trapezoidal_averages_consecutive_rates() {
        let p = DeviceParams {
            gap_ini: 1.7e-9,
            integration: GapIntegration::Trapezoidal,
            ..Default::default()
        };
        let s0 = DeviceState::initial(&p);
        let s1 = advance(&p, &s0, 1.4, Excitation::Voltage, &mut rng());
        let expected = s0.gap + 0.5 * s1.total_rate * p.time_step;
        assert!((s1.gap - expected).abs() < 1e-24);

        let euler = advance(
            &DeviceParams {
                integration: GapIntegration::ForwardEuler,
                ..p
            },
            &s0,
            1.4,
            Excitation::Voltage,
            &mut rng(),
        );
        assert!(euler.gap < s1.gap);
    }

    #[test]
    fn same_rng_stream_gives_same_noise() {
        let p = DeviceParams {
            variability: Variability::Enabled,
            gap_ini: 1.0e-9,
            ..Default::default()
        };
        let s0 = DeviceState::initial(&p);
        let a = advance(&p, &s0, 1.0, Excitation::Voltage, &mut rng());
        let b = advance(&p, &s0, 1.0, Excitation::Voltage, &mut rng());
        assert_eq!(a, b);
        assert_ne!(a.total_rate, a.gap_rate);
    }
}
