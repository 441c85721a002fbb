//! Profile simulator
//!
//! Converts a profile into the reference (time, temperature) trace that
//! the editor plots and the firmware tracks. Pure and deterministic: no
//! I/O, no shared state, and the same profile always yields the same trace.

pub mod engine;
mod rasterize;
pub mod result;

pub use engine::{simulate, simulate_with};
pub use result::{Sample, SegmentError, SegmentErrorKind, SegmentSpan, SimulationResult};
