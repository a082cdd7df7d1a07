//! Which terminal quantity a stimulus drives.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DeviceError;

/// Excitation mode of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Excitation {
    /// Stimulus sets the terminal voltage; current follows, subject to the limit.
    #[default]
    Voltage,
    /// Stimulus sets the terminal current; voltage follows, no limiting.
    Current,
}

impl Excitation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Voltage => "voltage",
            Self::Current => "current",
        }
    }
}

impl fmt::Display for Excitation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Excitation {
    type Err = DeviceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "voltage" => Ok(Self::Voltage),
            "current" => Ok(Self::Current),
            _ => Err(DeviceError::InvalidStimulusMode {
                given: s.to_string(),
            }),
        }
    }
}
