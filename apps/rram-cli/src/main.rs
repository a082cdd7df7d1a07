mod bench;
mod config;
mod error;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand};
use rram_device::{DeviceParams, Excitation, TransientProgress, Variability};
use rram_results::{RunManifest, RunStore, StepRecord, summarize, write_csv};
use rram_stimulus::{SquareWave, Stimulus};

use crate::bench::{BenchRequest, BenchResponse, BenchTiming};
use crate::config::{CommonArgs, DEFAULT_STORE_DIR};
use crate::error::CliResult;

#[derive(Parser)]
#[command(name = "rram-cli")]
#[command(about = "RRAM compact-model test benches", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Voltage-driven butterfly sweep (negative triangle, then positive)
    ButterflyVoltage {
        /// Sweep amplitude in volts
        #[arg(long, default_value_t = 1.55, allow_negative_numbers = true)]
        level: f64,
        /// Duration of each triangle in seconds
        #[arg(long, default_value_t = 8e-6)]
        duration: f64,
        /// Sample spacing and integration step in seconds
        #[arg(long, default_value_t = 1e-9)]
        dt: f64,
        /// Initial gap in meters
        #[arg(long)]
        gap_ini: Option<f64>,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Current-driven butterfly sweep
    ButterflyCurrent {
        /// Peak current of the first triangle in amperes
        #[arg(long, default_value_t = -0.02, allow_negative_numbers = true)]
        level_neg: f64,
        /// Peak current of the second triangle in amperes
        #[arg(long, default_value_t = 0.09, allow_negative_numbers = true)]
        level_pos: f64,
        #[arg(long, default_value_t = 8e-6)]
        duration: f64,
        #[arg(long, default_value_t = 1e-9)]
        dt: f64,
        #[arg(long)]
        gap_ini: Option<f64>,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Single programming pulse from the high-resistance state
    ProgramPulse {
        /// Pulse height in volts
        #[arg(long, default_value_t = 1.4, allow_negative_numbers = true)]
        level: f64,
        #[arg(long, default_value_t = 50e-9)]
        delay: f64,
        /// Edge duration in seconds
        #[arg(long, default_value_t = 1e-9)]
        transition: f64,
        /// Pulse duration in seconds, edges included
        #[arg(long, default_value_t = 0.6e-6)]
        pulse: f64,
        #[arg(long, default_value_t = 0.65e-6)]
        period: f64,
        #[arg(long, default_value_t = 1e-9)]
        dt: f64,
        #[arg(long)]
        gap_ini: Option<f64>,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Butterfly sweep over several independently seeded devices
    Variability {
        /// Number of devices; seeds run from --seed upwards
        #[arg(long)]
        seeds: u64,
        /// Excitation of the sweep: voltage or current
        #[arg(long, default_value = "voltage")]
        mode: Excitation,
        /// Symmetric sweep amplitude (volts or amperes); defaults to the
        /// butterfly bench levels of the chosen excitation
        #[arg(long, allow_negative_numbers = true)]
        level: Option<f64>,
        #[arg(long, default_value_t = 8e-6)]
        duration: f64,
        #[arg(long, default_value_t = 1e-9)]
        dt: f64,
        #[arg(long)]
        gap_ini: Option<f64>,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// List cached runs
    Runs {
        #[arg(long, default_value = DEFAULT_STORE_DIR)]
        store: PathBuf,
        /// Only runs of this bench
        #[arg(long)]
        bench: Option<String>,
    },
    /// Show details of a cached run
    ShowRun {
        run_id: String,
        #[arg(long, default_value = DEFAULT_STORE_DIR)]
        store: PathBuf,
        /// Export the run history to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

const BUTTERFLY_GAP_INI: f64 = 2e-10;
const BUTTERFLY_VOLTAGE: f64 = 1.55;
const BUTTERFLY_CURRENT: (f64, f64) = (-0.02, 0.09);
const PULSE_GAP_INI: f64 = 17e-10;

fn main() -> CliResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::ButterflyVoltage {
            level,
            duration,
            dt,
            gap_ini,
            common,
        } => {
            let stimulus = bench::voltage_butterfly(level, duration, dt)?;
            let params = common.resolve_params(gap_ini, BUTTERFLY_GAP_INI, dt)?;
            cmd_bench(
                "butterfly-voltage",
                &common,
                params,
                &stimulus,
                Excitation::Voltage,
            )
        }
        Commands::ButterflyCurrent {
            level_neg,
            level_pos,
            duration,
            dt,
            gap_ini,
            common,
        } => {
            let stimulus = bench::butterfly(level_neg, level_pos, duration, dt)?;
            let params = common.resolve_params(gap_ini, BUTTERFLY_GAP_INI, dt)?;
            cmd_bench(
                "butterfly-current",
                &common,
                params,
                &stimulus,
                Excitation::Current,
            )
        }
        Commands::ProgramPulse {
            level,
            delay,
            transition,
            pulse,
            period,
            dt,
            gap_ini,
            common,
        } => {
            let stimulus = bench::programming_pulse(&SquareWave {
                level,
                delay,
                transition_time: transition,
                pulse_duration: pulse,
                period,
                dt,
                cycles: 1,
            })?;
            let params = common.resolve_params(gap_ini, PULSE_GAP_INI, dt)?;
            cmd_bench(
                "program-pulse",
                &common,
                params,
                &stimulus,
                Excitation::Voltage,
            )
        }
        Commands::Variability {
            seeds,
            mode,
            level,
            duration,
            dt,
            gap_ini,
            common,
        } => {
            let stimulus = match (mode, level) {
                (_, Some(level)) => bench::voltage_butterfly(level, duration, dt)?,
                (Excitation::Voltage, None) => {
                    bench::voltage_butterfly(BUTTERFLY_VOLTAGE, duration, dt)?
                }
                (Excitation::Current, None) => {
                    bench::butterfly(BUTTERFLY_CURRENT.0, BUTTERFLY_CURRENT.1, duration, dt)?
                }
            };
            let params = common
                .resolve_params(gap_ini, BUTTERFLY_GAP_INI, dt)?
                .with_variability(Variability::Enabled);
            let seeds: Vec<u64> = (0..seeds).map(|k| common.seed.wrapping_add(k)).collect();
            cmd_variability(&common, params, &stimulus, mode, &seeds)
        }
        Commands::Runs { store, bench } => cmd_runs(&store, bench.as_deref()),
        Commands::ShowRun {
            run_id,
            store,
            csv,
        } => cmd_show_run(&store, &run_id, csv.as_deref()),
    }
}

fn cmd_bench(
    bench: &str,
    common: &CommonArgs,
    params: DeviceParams,
    stimulus: &Stimulus,
    excitation: Excitation,
) -> CliResult<()> {
    println!(
        "Running {} ({} steps, dt = {:.3e} s)",
        bench,
        stimulus.len(),
        params.time_step
    );

    let store = RunStore::new(&common.store)?;
    let request = BenchRequest {
        bench,
        params,
        stimulus,
        excitation,
        seed: common.seed,
        use_cache: !common.no_cache,
    };

    let started = Instant::now();
    let mut last_emit = Instant::now();
    let progress_every = (stimulus.len() / 200).max(1);
    let response = bench::ensure_run(&store, &request, progress_every, |progress| {
        if last_emit.elapsed().as_millis() >= 100 || progress.step == progress.total {
            render_cli_progress(progress, started.elapsed().as_secs_f64());
            last_emit = Instant::now();
        }
        ControlFlow::Continue(())
    })?;
    clear_progress_line();

    report_response(&response);
    print_timing_summary(&response.timing);

    if let Some(path) = &common.csv {
        export_csv(path, &response.records)?;
    }
    Ok(())
}

fn cmd_variability(
    common: &CommonArgs,
    params: DeviceParams,
    stimulus: &Stimulus,
    excitation: Excitation,
    seeds: &[u64],
) -> CliResult<()> {
    println!(
        "Running {} devices ({} excitation, {} steps each)",
        seeds.len(),
        excitation,
        stimulus.len()
    );

    let store = RunStore::new(&common.store)?;
    let request = BenchRequest {
        bench: "variability",
        params,
        stimulus,
        excitation,
        seed: common.seed,
        use_cache: !common.no_cache,
    };
    let response = bench::ensure_ensemble(&store, &request, seeds)?;

    println!("\n  seed  final gap (m)  gap range (m)            peak |I| (A)");
    for member in &response.members {
        if let Some(s) = summarize(&member.records) {
            println!(
                "  {:>4}  {:>13.4e}  {:.4e} - {:.4e}  {:.4e}{}",
                member.manifest.seed,
                s.final_gap,
                s.gap_range.0,
                s.gap_range.1,
                s.peak_current,
                if member.loaded_from_cache {
                    "  (cached)"
                } else {
                    ""
                }
            );
        }
    }
    print_timing_summary(&response.timing);

    if let Some(path) = &common.csv {
        for member in &response.members {
            export_csv(
                &seeded_path(path, member.manifest.seed),
                &member.records,
            )?;
        }
    }
    Ok(())
}

/// `out.csv` -> `out_seed7.csv`
fn seeded_path(path: &Path, seed: u64) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}_seed{seed}.{}", ext.to_string_lossy()),
        None => format!("{stem}_seed{seed}"),
    };
    path.with_file_name(name)
}

fn export_csv(path: &Path, records: &[StepRecord]) -> CliResult<()> {
    let file = BufWriter::new(File::create(path)?);
    write_csv(records, file)?;
    println!(
        "✓ Exported {} data points to {}",
        records.len(),
        path.display()
    );
    Ok(())
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(100));
    let _ = io::stdout().flush();
}

fn render_cli_progress(progress: &TransientProgress, elapsed_wall_s: f64) {
    let width = 28usize;
    let fraction = progress.fraction_complete();
    let filled = ((fraction * width as f64).round() as usize).min(width);
    let bar = format!(
        "{}{}",
        "#".repeat(filled),
        "-".repeat(width.saturating_sub(filled))
    );
    print!(
        "\r[{}] {:>6.2}%  t={:.3e}s  step={}/{}  elapsed={:.1}s",
        bar,
        fraction * 100.0,
        progress.sim_time,
        progress.step,
        progress.total,
        elapsed_wall_s
    );
    let _ = io::stdout().flush();
}

fn report_response(response: &BenchResponse) {
    let manifest = &response.manifest;
    if response.loaded_from_cache {
        println!("✓ Loaded from cache: {}", manifest.run_id);
    } else if manifest.completed {
        println!("✓ Simulation completed: {}", manifest.run_id);
    } else {
        println!("! Simulation stopped early: {}", manifest.run_id);
    }
    print_run_summary(manifest, &response.records);
}

fn print_run_summary(manifest: &RunManifest, records: &[StepRecord]) {
    println!("  Bench: {}", manifest.bench);
    println!("  Excitation: {}", manifest.excitation);
    println!("  Seed: {}", manifest.seed);
    println!("  Variability: {:?}", manifest.params.variability);
    println!("  Integration: {:?}", manifest.params.integration);

    match summarize(records) {
        Some(s) => {
            println!("  Time points: {}", s.steps);
            println!(
                "  Time range: {:.3e} - {:.3e} s",
                s.time_range.0, s.time_range.1
            );
            println!(
                "  Gap: {:.4e} m -> {:.4e} m (range {:.4e} - {:.4e})",
                manifest.params.gap_ini, s.final_gap, s.gap_range.0, s.gap_range.1
            );
            println!("  Peak |V|: {:.4} V", s.peak_voltage);
            println!("  Peak |I|: {:.4e} A", s.peak_current);
        }
        None => println!("  Time points: 0"),
    }
}

fn print_timing_summary(timing: &BenchTiming) {
    let phases = [
        ("Simulate", timing.simulate_s),
        ("Save", timing.save_s),
        ("Cache load", timing.load_s),
    ];
    if phases.iter().all(|(_, t)| t.is_none()) {
        return;
    }

    println!("\nTiming summary:");
    for (label, t) in phases {
        if let Some(t) = t {
            println!("  {:<10} {:.3}s", format!("{label}:"), t);
        }
    }
}

fn cmd_runs(store_dir: &Path, bench: Option<&str>) -> CliResult<()> {
    let store = RunStore::new(store_dir)?;
    let runs = store.list_runs(bench)?;

    if runs.is_empty() {
        match bench {
            Some(b) => println!("No cached runs found for bench: {}", b),
            None => println!("No cached runs found in {}", store_dir.display()),
        }
    } else {
        println!("Cached runs:");
        for manifest in runs {
            println!(
                "  {} {} seed={} steps={} ({})",
                manifest.run_id, manifest.bench, manifest.seed, manifest.steps, manifest.timestamp
            );
        }
    }
    Ok(())
}

fn cmd_show_run(store_dir: &Path, run_id: &str, csv: Option<&Path>) -> CliResult<()> {
    println!("Loading run: {}", run_id);

    let store = RunStore::new(store_dir)?;
    let manifest = store.load_manifest(run_id)?;
    let records = store.load_timeseries(run_id)?;

    println!("\nRun Summary:");
    println!("  Created: {}", manifest.timestamp);
    println!("  Version: {}", manifest.version);
    print_run_summary(&manifest, &records);

    println!("\nParameters:");
    print!("{}", serde_yaml::to_string(&manifest.params)?);

    if let Some(path) = csv {
        export_csv(path, &records)?;
    }
    Ok(())
}
