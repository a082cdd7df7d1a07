//! Triangular sweeps and trapezoidal pulse trains.
//!
//! Sample counts follow the usual half-open `arange` / truncating-count
//! conventions so that waveforms line up with a fixed integration step.

use serde::{Deserialize, Serialize};

use crate::error::{StimulusError, StimulusResult};
use crate::stimulus::Stimulus;
use rram_core::ensure_finite;

/// Triangular sweep 0 -> `level` -> 0 over `duration`, repeated `cycles` times.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriangularWave {
    /// Peak value (sign sets the sweep direction)
    pub level: f64,
    /// Duration of a single triangle (s)
    pub duration: f64,
    /// Sample spacing (s)
    pub dt: f64,
    pub cycles: usize,
}

impl TriangularWave {
    pub fn new(level: f64, duration: f64, dt: f64) -> Self {
        Self {
            level,
            duration,
            dt,
            cycles: 1,
        }
    }

    pub fn with_cycles(mut self, cycles: usize) -> Self {
        self.cycles = cycles;
        self
    }
}

/// Trapezoidal pulse train.
///
/// One period is: rising edge, plateau, falling edge, low segment. The whole
/// train is preceded by `delay` of zeros.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SquareWave {
    /// High value
    pub level: f64,
    /// Zero time before the first rising edge (s)
    pub delay: f64,
    /// Rising and falling edge duration (s)
    pub transition_time: f64,
    /// Edge-to-edge pulse duration, both transitions included (s)
    pub pulse_duration: f64,
    /// Duration of one period (s)
    pub period: f64,
    /// Sample spacing (s)
    pub dt: f64,
    pub cycles: usize,
}

/// `n` evenly spaced samples from `start` to `stop` inclusive.
///
/// A single sample is `start`; the last of several is exactly `stop`.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            let mut out: Vec<f64> = (0..n).map(|k| start + k as f64 * step).collect();
            out[n - 1] = stop;
            out
        }
    }
}

/// Number of samples in the half-open range `[start, stop)` at spacing `step`.
fn arange_len(start: f64, stop: f64, step: f64) -> usize {
    ((stop - start) / step).ceil().max(0.0) as usize
}

/// Truncating sample count for a segment of length `span`.
fn segment_len(span: f64, dt: f64) -> usize {
    (span / dt) as usize
}

fn check_dt(dt: f64) -> StimulusResult<f64> {
    let dt = ensure_finite(dt, "dt")?;
    if dt <= 0.0 {
        return Err(StimulusError::InvalidArg {
            what: "dt must be positive",
        });
    }
    Ok(dt)
}

/// Synthesize a triangular sweep.
pub fn triangular(wave: &TriangularWave) -> StimulusResult<Stimulus> {
    let dt = check_dt(wave.dt)?;
    let level = ensure_finite(wave.level, "level")?;
    let duration = ensure_finite(wave.duration, "duration")?;
    if duration <= 0.0 {
        return Err(StimulusError::InvalidArg {
            what: "duration must be positive",
        });
    }
    if wave.cycles == 0 {
        return Err(StimulusError::InvalidArg {
            what: "cycles must be at least 1",
        });
    }

    let half = duration / 2.0;
    let slope = level / half;

    let rising = (0..arange_len(0.0, half, dt)).map(|k| slope * (k as f64 * dt));
    let falling = (0..arange_len(half, duration, dt)).map(|k| {
        let t = half + k as f64 * dt;
        level - slope * (t - half)
    });
    let single: Vec<f64> = rising.chain(falling).collect();

    let mut signal = Vec::with_capacity(single.len() * wave.cycles);
    for _ in 0..wave.cycles {
        signal.extend_from_slice(&single);
    }

    Ok(Stimulus::uniform(signal, dt))
}

/// Synthesize a trapezoidal pulse train.
pub fn square(wave: &SquareWave) -> StimulusResult<Stimulus> {
    let dt = check_dt(wave.dt)?;
    let level = ensure_finite(wave.level, "level")?;
    let delay = ensure_finite(wave.delay, "delay")?;
    let tr = ensure_finite(wave.transition_time, "transition_time")?;
    let pw = ensure_finite(wave.pulse_duration, "pulse_duration")?;
    let period = ensure_finite(wave.period, "period")?;

    if delay < 0.0 || tr < 0.0 {
        return Err(StimulusError::InvalidArg {
            what: "delay and transition_time must be non-negative",
        });
    }
    if pw < 2.0 * tr {
        return Err(StimulusError::InvalidArg {
            what: "pulse_duration must cover both transitions",
        });
    }
    if period < pw {
        return Err(StimulusError::InvalidArg {
            what: "period must be at least pulse_duration",
        });
    }
    if wave.cycles == 0 {
        return Err(StimulusError::InvalidArg {
            what: "cycles must be at least 1",
        });
    }

    let edge = segment_len(tr, dt);
    let mut single = linspace(0.0, level, edge);
    single.extend(std::iter::repeat_n(level, segment_len(pw - 2.0 * tr, dt)));
    single.extend(linspace(level, 0.0, edge));
    single.extend(std::iter::repeat_n(0.0, segment_len(period - pw, dt)));

    let pre_delay = segment_len(delay, dt);
    let mut signal = Vec::with_capacity(pre_delay + single.len() * wave.cycles);
    signal.resize(pre_delay, 0.0);
    for _ in 0..wave.cycles {
        signal.extend_from_slice(&single);
    }

    Ok(Stimulus::uniform(signal, dt))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn triangular_stays_between_zero_and_level(
            level in -5.0_f64..5.0,
            steps in 2_usize..400,
            cycles in 1_usize..4,
        ) {
            let dt = 1e-9;
            let wave = TriangularWave::new(level, steps as f64 * dt, dt).with_cycles(cycles);
            let stim = triangular(&wave).unwrap();
            prop_assert!(stim.validate().is_ok());
            let (lo, hi) = if level < 0.0 { (level, 0.0) } else { (0.0, level) };
            let eps = 1e-9 * level.abs().max(1.0);
            for &v in stim.signal() {
                prop_assert!(v >= lo - eps && v <= hi + eps);
            }
        }
    }
}
