use crate::{RramError, RramResult};
use core::f64::consts::LN_2;

/// Floating point type used throughout system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> RramResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(RramError::NonFinite { what, value: v })
    }
}

/// `exp(x)` that saturates at `Real::MAX` instead of overflowing to infinity.
///
/// Underflow already yields 0 in IEEE arithmetic.
#[inline]
pub fn saturating_exp(x: Real) -> Real {
    let y = x.exp();
    if y.is_infinite() { Real::MAX } else { y }
}

/// Clamp infinities to the largest finite magnitude; NaN passes through.
#[inline]
pub fn saturate(x: Real) -> Real {
    x.clamp(-Real::MAX, Real::MAX)
}

/// `exp(log_scale) * sinh(x)` without overflow or `0 * inf` NaNs.
///
/// The direct product is used whenever it is finite; otherwise the magnitude
/// is evaluated in the log domain and saturated.
pub fn scaled_sinh(log_scale: Real, x: Real) -> Real {
    let direct = log_scale.exp() * x.sinh();
    if direct.is_finite() || x.is_nan() || log_scale.is_nan() {
        return direct;
    }
    if x == 0.0 {
        return 0.0_f64.copysign(x);
    }

    // ln(sinh|x|) = |x| + ln(1 - e^(-2|x|)) - ln 2
    let ax = x.abs();
    let log_mag = log_scale + ax + (-(-2.0 * ax).exp()).ln_1p() - LN_2;
    saturating_exp(log_mag).copysign(x)
}

/// `asinh(z * exp(log_scale))` without overflow in the argument.
pub fn scaled_asinh(z: Real, log_scale: Real) -> Real {
    let direct = (z * log_scale.exp()).asinh();
    if direct.is_finite() || z.is_nan() || log_scale.is_nan() {
        return direct;
    }
    if z == 0.0 {
        return 0.0_f64.copysign(z);
    }

    // asinh(w) = ln(2|w|) once |w| is far beyond 1
    (LN_2 + z.abs().ln() + log_scale).copysign(z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn saturating_exp_limits() {
        assert_eq!(saturating_exp(1.0e4), Real::MAX);
        assert_eq!(saturating_exp(-1.0e4), 0.0);
        assert!((saturating_exp(1.0) - core::f64::consts::E).abs() < 1e-15);
    }

    #[test]
    fn saturate_clamps_infinities() {
        assert_eq!(saturate(Real::INFINITY), Real::MAX);
        assert_eq!(saturate(Real::NEG_INFINITY), -Real::MAX);
        assert_eq!(saturate(-2.5), -2.5);
        assert!(saturate(Real::NAN).is_nan());
    }

    #[test]
    fn scaled_sinh_matches_direct_in_range() {
        let v = scaled_sinh(-2.0, 1.5);
        let expected = (-2.0_f64).exp() * 1.5_f64.sinh();
        assert!(nearly_equal(v, expected, Tolerances::default()));
    }

    #[test]
    fn scaled_sinh_underflow_times_overflow_is_finite() {
        // exp(-800) underflows to 0 and sinh(800) overflows; product is e^0 / 2
        let v = scaled_sinh(-800.0, 800.0);
        assert!(v.is_finite());
        assert!(nearly_equal(v, 0.5, Tolerances::default()));

        let v = scaled_sinh(-800.0, -800.0);
        assert!(nearly_equal(v, -0.5, Tolerances::default()));
    }

    #[test]
    fn scaled_sinh_saturates() {
        assert_eq!(scaled_sinh(0.0, 2000.0), Real::MAX);
        assert_eq!(scaled_sinh(0.0, -2000.0), -Real::MAX);
        assert_eq!(scaled_sinh(-1.0e6, 3.0), 0.0);
    }

    #[test]
    fn scaled_asinh_large_argument() {
        let v = scaled_asinh(1.0, 800.0);
        assert!(nearly_equal(v, LN_2 + 800.0, Tolerances::default()));
        let v = scaled_asinh(-1.0, 800.0);
        assert!(nearly_equal(v, -(LN_2 + 800.0), Tolerances::default()));
    }
}
