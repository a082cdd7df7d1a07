//! Paired time / signal sample arrays.

use serde::{Deserialize, Serialize};

use crate::error::{StimulusError, StimulusResult};

/// A sampled drive waveform.
///
/// `signal[i]` is applied at `time[i]`. Whether the samples are volts or
/// amperes is decided by the consumer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawStimulus")]
pub struct Stimulus {
    time: Vec<f64>,
    signal: Vec<f64>,
}

/// Unchecked wire form; deserialization goes through [`Stimulus::new`].
#[derive(Deserialize)]
struct RawStimulus {
    time: Vec<f64>,
    signal: Vec<f64>,
}

impl TryFrom<RawStimulus> for Stimulus {
    type Error = StimulusError;

    fn try_from(raw: RawStimulus) -> StimulusResult<Self> {
        Self::new(raw.time, raw.signal)
    }
}

impl Stimulus {
    /// Create a stimulus, checking equal lengths and non-decreasing time.
    pub fn new(time: Vec<f64>, signal: Vec<f64>) -> StimulusResult<Self> {
        let stimulus = Self { time, signal };
        stimulus.validate()?;
        Ok(stimulus)
    }

    /// Build a stimulus sampled at `k * dt`.
    pub(crate) fn uniform(signal: Vec<f64>, dt: f64) -> Self {
        let time = (0..signal.len()).map(|k| k as f64 * dt).collect();
        Self { time, signal }
    }

    /// `n` zero samples at spacing `dt`.
    pub fn zeros(n: usize, dt: f64) -> Self {
        Self::uniform(vec![0.0; n], dt)
    }

    pub fn validate(&self) -> StimulusResult<()> {
        if self.time.len() != self.signal.len() {
            return Err(StimulusError::LengthMismatch {
                time: self.time.len(),
                signal: self.signal.len(),
            });
        }
        if let Some(index) = self
            .time
            .windows(2)
            .position(|w| w[1] < w[0] || w[1].is_nan())
        {
            return Err(StimulusError::NonMonotonicTime { index: index + 1 });
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.signal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signal.is_empty()
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn signal(&self) -> &[f64] {
        &self.signal
    }

    /// Spacing between the first two samples, if there are two.
    pub fn sample_interval(&self) -> Option<f64> {
        match self.time.as_slice() {
            [t0, t1, ..] => Some(t1 - t0),
            _ => None,
        }
    }

    /// Time of the last sample (0 for an empty stimulus).
    pub fn end_time(&self) -> f64 {
        self.time.last().copied().unwrap_or(0.0)
    }

    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.time, self.signal)
    }
}
