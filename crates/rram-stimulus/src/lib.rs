//! Stimulus synthesis for device test benches.
//!
//! Provides:
//! - [`Stimulus`]: paired time / signal sample arrays
//! - Triangular sweeps and trapezoidal pulse trains
//! - Time-shifted concatenation of sub-waveforms

pub mod compose;
pub mod error;
pub mod stimulus;
pub mod waveform;

pub use compose::concat;
pub use error::{StimulusError, StimulusResult};
pub use stimulus::Stimulus;
pub use waveform::{SquareWave, TriangularWave, linspace, square, triangular};
