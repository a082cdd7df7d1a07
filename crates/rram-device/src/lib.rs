//! Stanford RRAM compact model (model 1) as a fixed-step transient integrator.
//!
//! Provides:
//! - Device parameters with the published model-card defaults
//! - Explicit device state and a pure single-step update
//! - Voltage- or current-driven excitation with series current limiting
//! - Transient driver recording a per-step history
//! - Parallel ensembles of independently seeded devices

pub mod conductance;
pub mod ensemble;
pub mod error;
pub mod excitation;
pub mod history;
pub mod kinetics;
pub mod model;
pub mod params;
pub mod state;
pub mod step;
pub mod transient;

pub use conductance::{OperatingPoint, current_from_voltage, limit_current, voltage_from_current};
pub use ensemble::run_ensemble;
pub use error::{DeviceError, DeviceResult};
pub use excitation::Excitation;
pub use history::TransientHistory;
pub use model::DeviceModel;
pub use params::{DeviceParams, GapIntegration, Variability};
pub use state::DeviceState;
pub use step::advance;
pub use transient::TransientProgress;
