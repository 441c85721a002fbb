//! Simulator configuration types

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Temperature every simulation starts from (°C)
pub const AMBIENT_TEMP_C: f64 = 25.0;

/// Rate substituted for a zero ramp slope (°C/s)
///
/// A zero slope means "as slow as possible", never "instant", so a ramp
/// always takes time.
pub const MIN_SLOPE_C_PER_S: f64 = 0.1;

/// Ramp rasterization density (samples per second of ramp duration)
pub const SAMPLES_PER_SECOND: f64 = 1.0;

/// Minimum samples generated per ramp, including the shared start sample
pub const MIN_RAMP_SAMPLES: usize = 2;

/// Upper bound on the number of samples in one trace
pub const MAX_SAMPLES: usize = 100_000;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Ambient temperature is NaN or infinite
    NonFiniteAmbient,
    /// Minimum slope is not a positive finite number
    InvalidMinSlope,
    /// Sample density is not a positive finite number
    InvalidDensity,
    /// Sample budget is zero
    ZeroSampleBudget,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonFiniteAmbient => write!(f, "ambient temperature must be finite"),
            ConfigError::InvalidMinSlope => write!(f, "minimum slope must be positive"),
            ConfigError::InvalidDensity => write!(f, "samples per second must be positive"),
            ConfigError::ZeroSampleBudget => write!(f, "sample budget must be non-zero"),
        }
    }
}

/// Simulator configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimulatorConfig {
    /// Starting temperature (°C)
    pub ambient_c: f64,
    /// Rate used in place of a zero ramp slope (°C/s)
    pub min_slope_c_per_s: f64,
    /// Ramp samples per second of duration
    pub samples_per_second: f64,
    /// Maximum samples in a trace, including the initial ambient sample
    pub max_samples: usize,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            ambient_c: AMBIENT_TEMP_C,
            min_slope_c_per_s: MIN_SLOPE_C_PER_S,
            samples_per_second: SAMPLES_PER_SECOND,
            max_samples: MAX_SAMPLES,
        }
    }
}

impl SimulatorConfig {
    /// Check that every field is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.ambient_c.is_finite() {
            return Err(ConfigError::NonFiniteAmbient);
        }
        if !(self.min_slope_c_per_s.is_finite() && self.min_slope_c_per_s > 0.0) {
            return Err(ConfigError::InvalidMinSlope);
        }
        if !(self.samples_per_second.is_finite() && self.samples_per_second > 0.0) {
            return Err(ConfigError::InvalidDensity);
        }
        if self.max_samples == 0 {
            return Err(ConfigError::ZeroSampleBudget);
        }
        Ok(())
    }
}
