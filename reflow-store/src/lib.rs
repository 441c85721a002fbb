//! Host-side persistence for reflow profiles
//!
//! - [`document`]: profile JSON documents exchanged with the editor
//! - [`config`]: simulator settings from a TOML file
//! - [`blob`]: compiled trajectories packed for oven firmware

pub mod blob;
pub mod config;
pub mod document;
pub mod error;

pub use blob::{decode_blob, encode_blob, BlobHeader, BLOB_MAGIC, BLOB_VERSION};
pub use config::{load_config, parse_config};
pub use document::ProfileDocument;
pub use error::{Result, StoreError};
