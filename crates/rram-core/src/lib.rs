//! rram-core: stable foundation for the RRAM simulator.
//!
//! Contains:
//! - units (uom SI types + constructors, physical constants)
//! - numeric (Real + tolerances + saturating float helpers)
//! - timing (opt-in wall-clock timers)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod timing;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{RramError, RramResult};
pub use numeric::*;
pub use units::*;
