//! Firmware profile blob
//!
//! A compiled trajectory packed with postcard behind a small header, ready
//! to be written into the oven's profile flash slot.

use log::debug;
use reflow_core::scheduler::CompiledProfile;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// Magic number identifying a profile blob
pub const BLOB_MAGIC: u32 = 0x5246_4C57; // "RFLW"

/// Current blob layout version
pub const BLOB_VERSION: u8 = 1;

/// Header written before the compiled profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobHeader {
    /// Magic number for validation
    pub magic: u32,
    /// Data format version
    pub version: u8,
}

impl Default for BlobHeader {
    fn default() -> Self {
        Self {
            magic: BLOB_MAGIC,
            version: BLOB_VERSION,
        }
    }
}

impl BlobHeader {
    /// Check if magic and version match this build
    pub fn is_valid(&self) -> bool {
        self.magic == BLOB_MAGIC && self.version == BLOB_VERSION
    }
}

/// Pack a compiled profile for the firmware
pub fn encode_blob(profile: &CompiledProfile) -> Result<Vec<u8>> {
    let mut bytes = postcard::to_allocvec(&BlobHeader::default())?;
    bytes.extend(postcard::to_allocvec(profile)?);
    debug!(
        "Encoded '{}' ({} waypoints) into {} bytes",
        profile.name,
        profile.waypoints.len(),
        bytes.len()
    );
    Ok(bytes)
}

/// Unpack a profile blob
///
/// The header is checked before the payload is parsed.
pub fn decode_blob(bytes: &[u8]) -> Result<CompiledProfile> {
    let (header, payload) = postcard::take_from_bytes::<BlobHeader>(bytes)?;
    if !header.is_valid() {
        return Err(StoreError::BlobHeader {
            magic: header.magic,
            version: header.version,
        });
    }
    Ok(postcard::from_bytes(payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reflow_core::profile::Profile;
    use reflow_core::simulate;

    fn sac305() -> CompiledProfile {
        let profile = Profile::sac305();
        CompiledProfile::compile(&profile, &simulate(&profile)).unwrap()
    }

    #[test]
    fn test_blob_round_trip() {
        let compiled = sac305();
        let bytes = encode_blob(&compiled).unwrap();
        assert_eq!(decode_blob(&bytes).unwrap(), compiled);
    }

    #[test]
    fn test_blob_starts_with_header() {
        let bytes = encode_blob(&sac305()).unwrap();
        let (header, _) = postcard::take_from_bytes::<BlobHeader>(&bytes).unwrap();
        assert_eq!(header, BlobHeader::default());
    }

    #[test]
    fn test_wrong_version_rejected() {
        let mut bytes = postcard::to_allocvec(&BlobHeader {
            magic: BLOB_MAGIC,
            version: BLOB_VERSION + 1,
        })
        .unwrap();
        bytes.extend(postcard::to_allocvec(&sac305()).unwrap());

        let err = decode_blob(&bytes).unwrap_err();
        assert!(matches!(
            err,
            StoreError::BlobHeader { version, .. } if version == BLOB_VERSION + 1
        ));
    }

    #[test]
    fn test_wrong_magic_rejected() {
        let bytes = postcard::to_allocvec(&BlobHeader {
            magic: 0x5049_4443,
            version: BLOB_VERSION,
        })
        .unwrap();
        assert!(matches!(
            decode_blob(&bytes),
            Err(StoreError::BlobHeader { magic: 0x5049_4443, .. })
        ));
    }

    #[test]
    fn test_truncated_blob() {
        let bytes = encode_blob(&sac305()).unwrap();
        let err = decode_blob(&bytes[..bytes.len() - 3]).unwrap_err();
        assert!(matches!(err, StoreError::Postcard(_)));
    }
}
