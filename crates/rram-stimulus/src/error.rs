//! Error types for stimulus construction.

use thiserror::Error;

/// Errors encountered while building a stimulus.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StimulusError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Time and signal lengths differ (time={time}, signal={signal})")]
    LengthMismatch { time: usize, signal: usize },

    #[error("Time decreases at sample {index}")]
    NonMonotonicTime { index: usize },

    #[error(transparent)]
    Core(#[from] rram_core::RramError),
}

pub type StimulusResult<T> = Result<T, StimulusError>;
