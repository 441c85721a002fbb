//! Board-agnostic core logic for reflow soldering profiles
//!
//! This crate contains everything that does not depend on a particular
//! oven, editor or storage backend:
//!
//! - Profile model (ramp/hold/step segments, safety limits)
//! - Profile simulator producing the reference temperature trace
//! - Simulator configuration
//! - Safety analysis of a simulated trace
//! - Trajectory compiler and setpoint scheduler for oven firmware

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

pub mod config;
pub mod profile;
pub mod safety;
pub mod scheduler;
pub mod simulator;

pub use config::SimulatorConfig;
pub use profile::{Profile, ProfileMeta, SafetyLimits, Segment};
pub use simulator::{simulate, simulate_with, Sample, SimulationResult};
