//! Independent devices driven by the same stimulus.
//!
//! Used for cycle-to-cycle variability studies: one model per seed, each with
//! its own random stream. Devices run in parallel; each device's steps stay
//! strictly sequential.

use rayon::prelude::*;
use tracing::info;

use crate::error::DeviceResult;
use crate::excitation::Excitation;
use crate::history::TransientHistory;
use crate::model::DeviceModel;
use crate::params::DeviceParams;
use crate::transient::check_stimulus;

/// Run one fresh device per seed; results are returned in `seeds` order.
pub fn run_ensemble(
    params: &DeviceParams,
    seeds: &[u64],
    time: &[f64],
    input: &[f64],
    excitation: Excitation,
) -> DeviceResult<Vec<TransientHistory>> {
    check_stimulus(time, input)?;
    info!(devices = seeds.len(), steps = input.len(), "running ensemble");

    seeds
        .par_iter()
        .map(|&seed| DeviceModel::new(*params, Some(seed)).transient(time, input, excitation))
        .collect()
}
