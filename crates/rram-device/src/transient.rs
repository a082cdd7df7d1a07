//! Transient driver: replay a stimulus through repeated single steps.

use std::ops::ControlFlow;

use rand::Rng;
use rram_core::ensure_finite;
use tracing::{debug, info_span, warn};

use crate::error::{DeviceError, DeviceResult};
use crate::excitation::Excitation;
use crate::history::TransientHistory;
use crate::params::DeviceParams;
use crate::state::DeviceState;
use crate::step::advance;

/// Progress report handed to transient callbacks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransientProgress {
    /// Steps completed so far
    pub step: usize,
    /// Steps in the full stimulus
    pub total: usize,
    /// Stimulus time of the last completed step (s)
    pub sim_time: f64,
}

impl TransientProgress {
    pub fn fraction_complete(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.step as f64 / self.total as f64
        }
    }
}

/// Reject a stimulus before any step runs.
pub(crate) fn check_stimulus(time: &[f64], input: &[f64]) -> DeviceResult<()> {
    if time.len() != input.len() {
        return Err(DeviceError::LengthMismatch {
            time: time.len(),
            input: input.len(),
        });
    }
    for &value in input {
        ensure_finite(value, "stimulus sample")?;
    }
    Ok(())
}

/// Run every sample of `input` in order, mutating `state` in place.
///
/// `on_progress` is called after every `progress_every` steps (never when
/// `progress_every` is 0); returning `Break` stops the run and yields the
/// history recorded so far with `completed == false`. A `Break` after the
/// last step has nothing left to stop, so that run still counts as completed.
#[allow(clippy::too_many_arguments)]
pub(crate) fn run<R, F>(
    params: &DeviceParams,
    state: &mut DeviceState,
    rng: &mut R,
    time: &[f64],
    input: &[f64],
    excitation: Excitation,
    progress_every: usize,
    mut on_progress: F,
) -> DeviceResult<TransientHistory>
where
    R: Rng + ?Sized,
    F: FnMut(&TransientProgress) -> ControlFlow<()>,
{
    check_stimulus(time, input)?;

    let total = input.len();
    let _span = info_span!("transient", steps = total, %excitation).entered();
    debug!(gap = state.gap, "transient start");

    let mut history = TransientHistory::with_capacity(total);
    for (i, (&t, &value)) in time.iter().zip(input).enumerate() {
        *state = advance(params, state, value, excitation, rng);
        history.record(t, state);

        let step = i + 1;
        if progress_every > 0 && step % progress_every == 0 {
            let progress = TransientProgress {
                step,
                total,
                sim_time: t,
            };
            if on_progress(&progress).is_break() && step < total {
                warn!(step, total, "transient stopped early");
                return Ok(history);
            }
        }
    }

    history.completed = true;
    debug!(gap = state.gap, temperature = state.temperature, "transient done");
    Ok(history)
}
