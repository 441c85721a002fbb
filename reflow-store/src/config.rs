//! Simulator settings file
//!
//! ```toml
//! [simulator]
//! ambient_c = 22.0
//! samples_per_second = 2.0
//! ```
//!
//! Every key is optional. Values are validated after parsing.

use std::path::Path;

use log::info;
use reflow_core::SimulatorConfig;
use serde::Deserialize;

use crate::error::{Result, StoreError};

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    simulator: SimulatorConfig,
}

/// Parse simulator settings from TOML text
pub fn parse_config(text: &str) -> Result<SimulatorConfig> {
    let file: ConfigFile = toml::from_str(text)?;
    file.simulator
        .validate()
        .map_err(StoreError::InvalidConfig)?;
    Ok(file.simulator)
}

/// Load simulator settings from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SimulatorConfig> {
    let path = path.as_ref();
    let config = parse_config(&std::fs::read_to_string(path)?)?;
    info!(
        "Simulator config from {}: ambient {} °C, {} samples/s, budget {}",
        path.display(),
        config.ambient_c,
        config.samples_per_second,
        config.max_samples
    );
    Ok(config)
}
