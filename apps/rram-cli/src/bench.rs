//! Test benches: stimulus construction and cached execution.

use std::ops::ControlFlow;

use rram_core::timing::Timer;
use rram_device::{
    DeviceModel, DeviceParams, Excitation, TransientHistory, TransientProgress, run_ensemble,
};
use rram_results::{
    RunId, RunManifest, RunStore, StepRecord, compute_run_id, records_from_history,
};
use rram_stimulus::{SquareWave, Stimulus, TriangularWave, concat, square, triangular};
use tracing::{info, warn};

use crate::error::CliResult;

/// Version folded into every run id, so a new build never reuses old results.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Negative triangle to `-|level|`, then positive triangle to `+|level|`.
pub fn voltage_butterfly(level: f64, duration: f64, dt: f64) -> CliResult<Stimulus> {
    butterfly(-level.abs(), level.abs(), duration, dt)
}

/// Triangle to `level_neg`, then triangle to `level_pos`.
pub fn butterfly(level_neg: f64, level_pos: f64, duration: f64, dt: f64) -> CliResult<Stimulus> {
    Ok(concat([
        triangular(&TriangularWave::new(level_neg, duration, dt))?,
        triangular(&TriangularWave::new(level_pos, duration, dt))?,
    ])?)
}

pub fn programming_pulse(wave: &SquareWave) -> CliResult<Stimulus> {
    Ok(concat([square(wave)?])?)
}

/// One simulation to run or load.
#[derive(Debug, Clone)]
pub struct BenchRequest<'a> {
    pub bench: &'a str,
    pub params: DeviceParams,
    pub stimulus: &'a Stimulus,
    pub excitation: Excitation,
    pub seed: u64,
    pub use_cache: bool,
}

/// Wall-clock phases; `None` when timing is disabled or the phase did not run.
#[derive(Debug, Clone, Copy, Default)]
pub struct BenchTiming {
    pub simulate_s: Option<f64>,
    pub save_s: Option<f64>,
    pub load_s: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct BenchResponse {
    pub manifest: RunManifest,
    pub records: Vec<StepRecord>,
    pub loaded_from_cache: bool,
    pub timing: BenchTiming,
}

#[derive(Debug, Clone)]
pub struct EnsembleResponse {
    /// One entry per requested seed, in request order
    pub members: Vec<BenchResponse>,
    pub timing: BenchTiming,
}

fn manifest_for(
    run_id: RunId,
    request: &BenchRequest<'_>,
    seed: u64,
    history: &TransientHistory,
) -> RunManifest {
    RunManifest {
        run_id,
        bench: request.bench.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        excitation: request.excitation,
        steps: history.len(),
        time_step_s: request.params.time_step,
        seed,
        params: request.params,
        completed: history.completed,
        version: VERSION.to_string(),
    }
}

fn run_id_for(request: &BenchRequest<'_>, seed: u64) -> CliResult<RunId> {
    Ok(compute_run_id(
        &request.params,
        request.stimulus,
        request.excitation,
        seed,
        VERSION,
    )?)
}

fn load_cached(store: &RunStore, run_id: &str) -> CliResult<BenchResponse> {
    let timer = Timer::start("load");
    let manifest = store.load_manifest(run_id)?;
    let records = store.load_timeseries(run_id)?;
    info!(run_id, "loaded cached run");
    Ok(BenchResponse {
        manifest,
        records,
        loaded_from_cache: true,
        timing: BenchTiming {
            load_s: timer.stop(),
            ..Default::default()
        },
    })
}

/// Persist a finished history; truncated runs are returned but never cached.
fn store_history(
    store: &RunStore,
    manifest: RunManifest,
    history: &TransientHistory,
) -> CliResult<(BenchResponse, Option<f64>)> {
    let records = records_from_history(history);
    let timer = Timer::start("save");
    if history.completed {
        store.save_run(&manifest, &records)?;
    } else {
        warn!(run_id = %manifest.run_id, "run stopped early; not cached");
    }
    let save_s = timer.stop();
    Ok((
        BenchResponse {
            manifest,
            records,
            loaded_from_cache: false,
            timing: BenchTiming::default(),
        },
        save_s,
    ))
}

/// Load the run from the store if cached, otherwise simulate and save it.
pub fn ensure_run<F>(
    store: &RunStore,
    request: &BenchRequest<'_>,
    progress_every: usize,
    on_progress: F,
) -> CliResult<BenchResponse>
where
    F: FnMut(&TransientProgress) -> ControlFlow<()>,
{
    let run_id = run_id_for(request, request.seed)?;
    if request.use_cache && store.has_run(&run_id) {
        return load_cached(store, &run_id);
    }

    info!(bench = request.bench, %run_id, steps = request.stimulus.len(), "simulating");
    let timer = Timer::start("simulate");
    let mut model = DeviceModel::new(request.params, Some(request.seed));
    let history = model.transient_with_progress(
        request.stimulus.time(),
        request.stimulus.signal(),
        request.excitation,
        progress_every,
        on_progress,
    )?;
    let simulate_s = timer.stop();

    let manifest = manifest_for(run_id, request, request.seed, &history);
    let (mut response, save_s) = store_history(store, manifest, &history)?;
    response.timing.simulate_s = simulate_s;
    response.timing.save_s = save_s;
    Ok(response)
}

/// [`ensure_run`] for one device per seed; only uncached seeds are simulated.
pub fn ensure_ensemble(
    store: &RunStore,
    request: &BenchRequest<'_>,
    seeds: &[u64],
) -> CliResult<EnsembleResponse> {
    let mut timing = BenchTiming::default();
    let mut members: Vec<Option<BenchResponse>> = vec![None; seeds.len()];
    let mut missing = Vec::new();

    let timer = Timer::start("load");
    for (slot, &seed) in seeds.iter().enumerate() {
        let run_id = run_id_for(request, seed)?;
        if request.use_cache && store.has_run(&run_id) {
            members[slot] = Some(load_cached(store, &run_id)?);
        } else {
            missing.push((slot, seed, run_id));
        }
    }
    timing.load_s = timer.stop();

    if !missing.is_empty() {
        let to_run: Vec<u64> = missing.iter().map(|(_, seed, _)| *seed).collect();
        let timer = Timer::start("simulate");
        let histories = run_ensemble(
            &request.params,
            &to_run,
            request.stimulus.time(),
            request.stimulus.signal(),
            request.excitation,
        )?;
        timing.simulate_s = timer.stop();

        let mut save_total = None;
        for ((slot, seed, run_id), history) in missing.into_iter().zip(&histories) {
            let manifest = manifest_for(run_id, request, seed, history);
            let (response, save_s) = store_history(store, manifest, history)?;
            if let Some(dt) = save_s {
                save_total = Some(save_total.unwrap_or(0.0) + dt);
            }
            members[slot] = Some(response);
        }
        timing.save_s = save_total;
    }

    Ok(EnsembleResponse {
        members: members.into_iter().flatten().collect(),
        timing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rram_device::Variability;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_dir(prefix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        std::env::temp_dir().join(format!("{prefix}_{nanos}"))
    }

    fn no_progress(_: &TransientProgress) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    #[test]
    fn butterfly_sweeps_negative_first() {
        let stim = voltage_butterfly(1.55, 8e-6, 1e-9).unwrap();
        assert_eq!(stim.len(), 16_000);
        let min = stim.signal().iter().copied().fold(f64::MAX, f64::min);
        let max = stim.signal().iter().copied().fold(f64::MIN, f64::max);
        assert_eq!(min, -1.55);
        assert_eq!(max, 1.55);
        assert!(stim.signal()[..8000].iter().all(|&v| v <= 0.0));
        assert!((stim.time()[8000] - 8e-6).abs() < 1e-15);
    }

    #[test]
    fn pulse_has_delay_and_plateau() {
        let stim = programming_pulse(&SquareWave {
            level: 1.4,
            delay: 50e-9,
            transition_time: 1e-9,
            pulse_duration: 0.6e-6,
            period: 0.65e-6,
            dt: 1e-9,
            cycles: 1,
        })
        .unwrap();
        assert!(stim.signal()[..50].iter().all(|&v| v == 0.0));
        assert!(stim.signal().contains(&1.4));
        assert_eq!(*stim.signal().last().unwrap(), 0.0);
    }

    #[test]
    fn second_run_comes_from_cache() {
        let store = RunStore::new(unique_temp_dir("rram_cli_cache")).unwrap();
        let stim = voltage_butterfly(1.5, 200e-9, 1e-9).unwrap();
        let request = BenchRequest {
            bench: "butterfly-voltage",
            params: DeviceParams::default(),
            stimulus: &stim,
            excitation: Excitation::Voltage,
            seed: 0,
            use_cache: true,
        };

        let first = ensure_run(&store, &request, 0, no_progress).unwrap();
        assert!(!first.loaded_from_cache);
        assert_eq!(first.records.len(), stim.len());
        assert!(first.manifest.completed);

        let second = ensure_run(&store, &request, 0, no_progress).unwrap();
        assert!(second.loaded_from_cache);
        assert_eq!(second.records, first.records);
        assert_eq!(second.manifest, first.manifest);

        let forced = ensure_run(
            &store,
            &BenchRequest {
                use_cache: false,
                ..request.clone()
            },
            0,
            no_progress,
        )
        .unwrap();
        assert!(!forced.loaded_from_cache);
        assert_eq!(forced.records, first.records);
    }

    #[test]
    fn early_stop_is_not_cached() {
        let store = RunStore::new(unique_temp_dir("rram_cli_partial")).unwrap();
        let stim = voltage_butterfly(1.5, 200e-9, 1e-9).unwrap();
        let request = BenchRequest {
            bench: "butterfly-voltage",
            params: DeviceParams::default(),
            stimulus: &stim,
            excitation: Excitation::Voltage,
            seed: 0,
            use_cache: true,
        };
        let partial = ensure_run(&store, &request, 50, |_| ControlFlow::Break(())).unwrap();
        assert_eq!(partial.records.len(), 50);
        assert!(!partial.manifest.completed);
        assert!(!store.has_run(&partial.manifest.run_id));
    }

    #[test]
    fn break_after_last_step_is_cached() {
        let store = RunStore::new(unique_temp_dir("rram_cli_final_break")).unwrap();
        let stim = voltage_butterfly(1.5, 200e-9, 1e-9).unwrap();
        let request = BenchRequest {
            bench: "butterfly-voltage",
            params: DeviceParams::default(),
            stimulus: &stim,
            excitation: Excitation::Voltage,
            seed: 0,
            use_cache: true,
        };
        let run = ensure_run(&store, &request, stim.len(), |_| ControlFlow::Break(())).unwrap();
        assert_eq!(run.records.len(), stim.len());
        assert!(run.manifest.completed);
        assert!(store.has_run(&run.manifest.run_id));
    }

    #[test]
    fn ensemble_mixes_cached_and_fresh_members() {
        let store = RunStore::new(unique_temp_dir("rram_cli_ensemble")).unwrap();
        let stim = voltage_butterfly(1.5, 200e-9, 1e-9).unwrap();
        let request = BenchRequest {
            bench: "variability",
            params: DeviceParams {
                variability: Variability::Enabled,
                ..Default::default()
            },
            stimulus: &stim,
            excitation: Excitation::Voltage,
            seed: 0,
            use_cache: true,
        };

        let first = ensure_ensemble(&store, &request, &[1, 2]).unwrap();
        assert!(first.members.iter().all(|m| !m.loaded_from_cache));

        let second = ensure_ensemble(&store, &request, &[1, 2, 3]).unwrap();
        let seeds: Vec<u64> = second.members.iter().map(|m| m.manifest.seed).collect();
        assert_eq!(seeds, vec![1, 2, 3]);
        assert!(second.members[0].loaded_from_cache);
        assert!(second.members[1].loaded_from_cache);
        assert!(!second.members[2].loaded_from_cache);
        assert_eq!(second.members[0].records, first.members[0].records);
    }
}
