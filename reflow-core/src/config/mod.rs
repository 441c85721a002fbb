//! Simulator configuration
//!
//! Board-agnostic tuning knobs for the profile simulator. Host tools load
//! them from TOML; firmware builds use the defaults.

pub mod simulator;

pub use simulator::*;
