use rram_device::DeviceError;
use rram_results::ResultsError;
use rram_stimulus::StimulusError;

pub type CliResult<T> = Result<T, CliError>;

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("Stimulus error: {0}")]
    Stimulus(#[from] StimulusError),

    #[error("Device error: {0}")]
    Device(#[from] DeviceError),

    #[error("Results error: {0}")]
    Results(#[from] ResultsError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported parameter file '{path}' (expected .yaml, .yml or .json)")]
    UnsupportedParamsFile { path: String },
}
