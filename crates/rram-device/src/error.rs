//! Error types for device simulation.

use thiserror::Error;

/// Errors encountered while driving the device model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeviceError {
    #[error("Invalid stimulus mode '{given}' (expected 'voltage' or 'current')")]
    InvalidStimulusMode { given: String },

    #[error("Time and input sequences differ in length (time={time}, input={input})")]
    LengthMismatch { time: usize, input: usize },

    #[error("Invalid parameter: {what}")]
    InvalidParam { what: &'static str },

    #[error(transparent)]
    Core(#[from] rram_core::RramError),
}

pub type DeviceResult<T> = Result<T, DeviceError>;
