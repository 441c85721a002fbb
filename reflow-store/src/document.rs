//! Profile JSON documents
//!
//! The editor saves profiles as pretty-printed JSON with `meta`, `safety`
//! and `segments` at the top level. Fields this crate does not know about
//! are kept in [`ProfileDocument::extra`] and written back unchanged.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::{debug, info, warn};
use reflow_core::profile::{Profile, Segment};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// Profile plus any unrecognized top-level fields
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProfileDocument {
    /// The profile itself
    #[serde(flatten)]
    pub profile: Profile,
    /// Top-level fields outside the profile model
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<Profile> for ProfileDocument {
    fn from(profile: Profile) -> Self {
        Self {
            profile,
            extra: Map::new(),
        }
    }
}

impl ProfileDocument {
    /// Starter document for a new profile (SAC305 lead-free)
    pub fn new_default() -> Self {
        Profile::sac305().into()
    }

    /// Parse a document from JSON text
    ///
    /// Malformed segment entries do not fail the parse; they decode as
    /// rejected segments and surface when the profile is simulated.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let document: Self = serde_json::from_str(json)?;
        document.report_rejected();
        Ok(document)
    }

    /// Parse a document from a reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let document: Self = serde_json::from_reader(BufReader::new(reader))?;
        document.report_rejected();
        Ok(document)
    }

    /// Load a document from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let document = Self::from_reader(File::open(path)?)?;
        info!(
            "Loaded profile '{}' ({} segments) from {}",
            document.profile.meta.name,
            document.profile.segments.len(),
            path.display()
        );
        Ok(document)
    }

    /// Serialize as pretty-printed JSON
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the document to disk
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut json = self.to_json_string()?;
        json.push('\n');
        std::fs::write(path, json)?;
        info!(
            "Saved profile '{}' to {}",
            self.profile.meta.name,
            path.display()
        );
        Ok(())
    }

    fn report_rejected(&self) {
        for (index, segment) in self.profile.segments.iter().enumerate() {
            if let Segment::Rejected(rejected) = segment {
                warn!("Segment {}: {}", index + 1, rejected.cause);
            }
        }
        if !self.extra.is_empty() {
            debug!("Keeping {} unrecognized top-level fields", self.extra.len());
        }
    }
}
