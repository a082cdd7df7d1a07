//! Mutable physical state of one device.

use serde::{Deserialize, Serialize};

use crate::params::DeviceParams;

/// State after the most recent step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviceState {
    /// Voltage across the terminals (V)
    pub terminal_voltage: f64,
    /// Current through the device (A)
    pub terminal_current: f64,
    /// Device temperature (K), never below ambient
    pub temperature: f64,
    /// Filament gap (m), always within `[gap_min, gap_max]`
    pub gap: f64,
    /// Deterministic gap rate of the last step (m/s)
    pub gap_rate: f64,
    /// Field-enhancement factor of the last step
    pub gamma: f64,
    /// Gap rate including the variability term, as integrated (m/s)
    pub total_rate: f64,
}

impl DeviceState {
    /// Unbiased device at ambient temperature with the initial gap.
    pub fn initial(params: &DeviceParams) -> Self {
        Self {
            terminal_voltage: 0.0,
            terminal_current: 0.0,
            temperature: params.t_ini,
            gap: params.gap_ini,
            gap_rate: 0.0,
            gamma: 0.0,
            total_rate: 0.0,
        }
    }
}
