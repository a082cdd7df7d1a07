//! Device parameter resolution: defaults, parameter file, then flags.

use std::path::{Path, PathBuf};

use clap::Args;
use rram_core::units::{m, s};
use rram_device::model::DEFAULT_SEED;
use rram_device::{DeviceParams, GapIntegration, Variability};
use tracing::debug;

use crate::error::{CliError, CliResult};

pub const DEFAULT_STORE_DIR: &str = ".rram/runs";

/// Flags shared by every simulating subcommand.
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Device parameter overrides (YAML or JSON)
    #[arg(long)]
    pub params: Option<PathBuf>,
    /// Seed of the variability noise stream
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,
    /// Enable cycle-to-cycle gap variability
    #[arg(long)]
    pub variability: bool,
    /// Integrate the gap with the trapezoidal rule
    #[arg(long)]
    pub trapezoidal: bool,
    /// Write the per-step history to this CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,
    /// Run store directory
    #[arg(long, default_value = DEFAULT_STORE_DIR)]
    pub store: PathBuf,
    /// Skip cache and force re-run
    #[arg(long)]
    pub no_cache: bool,
}

/// Read a `DeviceParams` override file; fields left out keep their defaults.
pub fn load_params(path: &Path) -> CliResult<DeviceParams> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let content = std::fs::read_to_string(path)?;
    let params = match extension.as_deref() {
        Some("yaml" | "yml") => serde_yaml::from_str(&content)?,
        Some("json") => serde_json::from_str(&content)?,
        _ => {
            return Err(CliError::UnsupportedParamsFile {
                path: path.display().to_string(),
            });
        }
    };
    debug!(path = %path.display(), "loaded device parameters");
    Ok(params)
}

impl CommonArgs {
    /// Resolve the parameters for one bench.
    ///
    /// `gap_ini` from the command line wins; without it the bench default
    /// applies unless a parameter file was given. The integration step always
    /// follows the stimulus sample spacing `dt`.
    pub fn resolve_params(
        &self,
        gap_ini: Option<f64>,
        bench_gap_ini: f64,
        dt: f64,
    ) -> CliResult<DeviceParams> {
        let mut params = match &self.params {
            Some(path) => load_params(path)?,
            None => DeviceParams::default().with_gap_ini(m(bench_gap_ini)),
        };
        if let Some(gap) = gap_ini {
            params = params.with_gap_ini(m(gap));
        }
        if self.variability {
            params = params.with_variability(Variability::Enabled);
        }
        if self.trapezoidal {
            params = params.with_integration(GapIntegration::Trapezoidal);
        }
        params = params.with_time_step(s(dt));
        params.validate()?;
        Ok(params)
    }
}
