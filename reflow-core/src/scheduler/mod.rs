//! Profile scheduler
//!
//! Compiles a simulated profile into a fixed-capacity trajectory and
//! steps through it to drive the oven heater.

pub mod compile;
pub mod executor;

pub use compile::{
    CompileError, CompiledProfile, CompiledSegment, Waypoint, MAX_NAME_LEN, MAX_NOTE_LEN,
    MAX_PROFILE_SEGMENTS, MAX_WAYPOINTS,
};
pub use executor::{Event, ExecutionPhase, HeaterCommand, Scheduler};
