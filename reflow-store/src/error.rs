//! Store error type

use reflow_core::config::ConfigError;

/// Errors that can occur while loading or saving profile data
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Profile document is not valid JSON or has the wrong shape
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Simulator config file is not valid TOML
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Firmware blob encode/decode failure
    #[error("Blob error: {0}")]
    Postcard(#[from] postcard::Error),

    /// Config parsed but holds unusable values
    #[error("Invalid simulator config: {0}")]
    InvalidConfig(ConfigError),

    /// Blob magic or version does not match this build
    #[error("Blob header mismatch: magic {magic:#010x}, version {version}")]
    BlobHeader {
        /// Magic found in the blob
        magic: u32,
        /// Version found in the blob
        version: u8,
    },
}

/// Result alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
