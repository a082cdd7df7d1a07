//! Content-based hashing for run IDs.

use rram_device::{DeviceParams, Excitation};
use rram_stimulus::Stimulus;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::ResultsResult;
use crate::types::RunId;

#[derive(Serialize)]
struct RunKey<'a> {
    params: &'a DeviceParams,
    stimulus: &'a Stimulus,
    excitation: Excitation,
    seed: u64,
    version: &'a str,
}

/// SHA-256 over the canonical JSON of every input that affects the output.
pub fn compute_run_id(
    params: &DeviceParams,
    stimulus: &Stimulus,
    excitation: Excitation,
    seed: u64,
    version: &str,
) -> ResultsResult<RunId> {
    let key = RunKey {
        params,
        stimulus,
        excitation,
        seed,
        version,
    };
    let mut hasher = Sha256::new();
    hasher.update(serde_json::to_vec(&key)?);
    Ok(format!("{:x}", hasher.finalize()))
}
