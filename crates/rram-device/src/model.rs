//! Stateful device model: parameters, state and a private noise stream.

use std::ops::ControlFlow;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rram_core::ensure_finite;

use crate::error::DeviceResult;
use crate::excitation::Excitation;
use crate::history::TransientHistory;
use crate::params::DeviceParams;
use crate::state::DeviceState;
use crate::step::advance;
use crate::transient::{self, TransientProgress};

/// Seed used when none is given.
pub const DEFAULT_SEED: u64 = 0;

/// One simulated RRAM device.
///
/// Each model owns its random stream, so several models can run side by side
/// (or on different threads) without perturbing each other's noise.
#[derive(Debug, Clone)]
pub struct DeviceModel {
    params: DeviceParams,
    state: DeviceState,
    rng: StdRng,
    seed: u64,
}

impl DeviceModel {
    /// Create a device at its initial state.
    ///
    /// Parameters are accepted as given; see [`DeviceParams::validate`].
    pub fn new(params: DeviceParams, seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or(DEFAULT_SEED);
        Self {
            state: DeviceState::initial(&params),
            params,
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn params(&self) -> &DeviceParams {
        &self.params
    }

    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Advance one fixed step.
    pub fn step(&mut self, input: f64, excitation: Excitation) -> DeviceResult<&DeviceState> {
        let input = ensure_finite(input, "stimulus sample")?;
        self.state = advance(&self.params, &self.state, input, excitation, &mut self.rng);
        Ok(&self.state)
    }

    /// Replay `input` one step per sample and record the history.
    ///
    /// `time` is carried into the history; the integrator always uses the
    /// configured `time_step`. Fails before stepping if the lengths differ or
    /// a sample is not finite.
    pub fn transient(
        &mut self,
        time: &[f64],
        input: &[f64],
        excitation: Excitation,
    ) -> DeviceResult<TransientHistory> {
        self.transient_with_progress(time, input, excitation, 0, |_| ControlFlow::Continue(()))
    }

    /// [`transient`](Self::transient) with a progress callback every
    /// `progress_every` steps that may stop the run early.
    pub fn transient_with_progress<F>(
        &mut self,
        time: &[f64],
        input: &[f64],
        excitation: Excitation,
        progress_every: usize,
        on_progress: F,
    ) -> DeviceResult<TransientHistory>
    where
        F: FnMut(&TransientProgress) -> ControlFlow<()>,
    {
        transient::run(
            &self.params,
            &mut self.state,
            &mut self.rng,
            time,
            input,
            excitation,
            progress_every,
            on_progress,
        )
    }
}
