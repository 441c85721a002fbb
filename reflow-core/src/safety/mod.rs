//! Safety analysis
//!
//! Checks a simulated trace against the profile's safety limits. Purely
//! advisory: the simulator never consults these limits.

pub mod report;

pub use report::{SafetyFinding, SafetyReport, SafetyStatus};
