//! Profile type definitions
//!
//! These types represent a reflow profile document. Defaults for absent
//! fields are applied when a segment is decoded, so the simulator only ever
//! sees fully populated variants.

use alloc::string::String;
use alloc::vec::Vec;

use super::decode::{ExtraFields, RawSegment, SegmentDecodeError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Display name used when a document carries none
pub const DEFAULT_PROFILE_NAME: &str = "Unnamed";

/// Default upper temperature reference (°C)
pub const DEFAULT_MAX_TEMP_C: f64 = 255.0;

/// Default advisory slope bound (°C/s)
pub const DEFAULT_MAX_SLOPE_C_PER_S: f64 = 3.0;

/// Ramp slope applied when a ramp has no `slope` field (°C/s)
pub const DEFAULT_RAMP_SLOPE_C_PER_S: f64 = 1.0;

/// Hold duration applied when a hold has no `duration_s` field (seconds)
pub const DEFAULT_HOLD_DURATION_S: f64 = 10.0;

/// Profile metadata
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProfileMeta {
    /// Display name
    pub name: String,
    /// Free-text description
    pub description: String,
    /// Fields outside the profile model, kept for writing back
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub extra: ExtraFields,
}

impl Default for ProfileMeta {
    fn default() -> Self {
        Self {
            name: String::from(DEFAULT_PROFILE_NAME),
            description: String::new(),
            extra: ExtraFields::new(),
        }
    }
}

/// Safety limits carried by the profile
///
/// Neither limit is enforced by the simulator. The editor draws
/// `max_temp_c` as a reference line and [`crate::safety`] reports
/// violations of both.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SafetyLimits {
    /// Maximum temperature (°C)
    #[cfg_attr(feature = "serde", serde(rename = "max_temp"))]
    pub max_temp_c: f64,
    /// Maximum ramp rate (°C/s), advisory
    #[cfg_attr(feature = "serde", serde(rename = "max_slope"))]
    pub max_slope_c_per_s: f64,
    /// Fields outside the profile model, kept for writing back
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub extra: ExtraFields,
}

impl Default for SafetyLimits {
    fn default() -> Self {
        Self {
            max_temp_c: DEFAULT_MAX_TEMP_C,
            max_slope_c_per_s: DEFAULT_MAX_SLOPE_C_PER_S,
            extra: ExtraFields::new(),
        }
    }
}

/// Segment kind discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SegmentKind {
    /// Continuous linear transition
    Ramp,
    /// Optional jump, then constant dwell
    Hold,
    /// Instantaneous jump
    Step,
}

impl SegmentKind {
    /// Document tag for this kind
    pub const fn tag(&self) -> &'static str {
        match self {
            SegmentKind::Ramp => "ramp",
            SegmentKind::Hold => "hold",
            SegmentKind::Step => "step",
        }
    }
}

/// Linear transition from the current temperature to `end_temp_c`
#[derive(Debug, Clone, PartialEq)]
pub struct Ramp {
    /// Target temperature (°C); `None` keeps the current temperature
    pub end_temp_c: Option<f64>,
    /// Rate of change (°C/s). The sign is ignored, zero means "slowest rate".
    pub slope_c_per_s: f64,
    /// Free-text label
    pub note: String,
    /// Document fields this kind does not use
    pub extra: ExtraFields,
}

/// Constant-temperature dwell, preceded by a jump if `temp_c` differs
/// from the current temperature
#[derive(Debug, Clone, PartialEq)]
pub struct Hold {
    /// Dwell time (seconds)
    pub duration_s: f64,
    /// Dwell temperature (°C); `None` keeps the current temperature
    pub temp_c: Option<f64>,
    /// Free-text label
    pub note: String,
    /// Document fields this kind does not use
    pub extra: ExtraFields,
}

/// Instantaneous jump to `temp_c`
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// Target temperature (°C); `None` keeps the current temperature
    pub temp_c: Option<f64>,
    /// Free-text label
    pub note: String,
    /// Document fields this kind does not use
    pub extra: ExtraFields,
}

/// Document entry that could not be decoded into a segment
///
/// Kept in place so the simulator reports it at its own position and the
/// document can be written back unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejected {
    /// Entry as it appeared in the document
    pub raw: RawSegment,
    /// Why decoding failed
    pub cause: SegmentDecodeError,
}

/// One instruction of a reflow profile
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Ramp(Ramp),
    Hold(Hold),
    Step(Step),
    Rejected(Rejected),
}

impl Segment {
    /// Create a ramp segment
    pub fn ramp(end_temp_c: f64, slope_c_per_s: f64) -> Self {
        Segment::Ramp(Ramp {
            end_temp_c: Some(end_temp_c),
            slope_c_per_s,
            note: String::new(),
            extra: ExtraFields::new(),
        })
    }

    /// Create a hold segment
    pub fn hold(temp_c: f64, duration_s: f64) -> Self {
        Segment::Hold(Hold {
            duration_s,
            temp_c: Some(temp_c),
            note: String::new(),
            extra: ExtraFields::new(),
        })
    }

    /// Create a step segment
    pub fn step(temp_c: f64) -> Self {
        Segment::Step(Step {
            temp_c: Some(temp_c),
            note: String::new(),
            extra: ExtraFields::new(),
        })
    }

    /// Replace the note of a decoded segment
    ///
    /// Rejected entries keep their original note.
    pub fn with_note(mut self, text: &str) -> Self {
        match &mut self {
            Segment::Ramp(r) => r.note = String::from(text),
            Segment::Hold(h) => h.note = String::from(text),
            Segment::Step(s) => s.note = String::from(text),
            Segment::Rejected(_) => {}
        }
        self
    }

    /// Segment kind, or `None` for a rejected entry
    pub fn kind(&self) -> Option<SegmentKind> {
        match self {
            Segment::Ramp(_) => Some(SegmentKind::Ramp),
            Segment::Hold(_) => Some(SegmentKind::Hold),
            Segment::Step(_) => Some(SegmentKind::Step),
            Segment::Rejected(_) => None,
        }
    }

    /// Free-text label
    pub fn note(&self) -> &str {
        match self {
            Segment::Ramp(r) => &r.note,
            Segment::Hold(h) => &h.note,
            Segment::Step(s) => &s.note,
            Segment::Rejected(r) => r.raw.note_text(),
        }
    }

    /// Target temperature the segment ends at, if it names one
    pub fn target_temp_c(&self) -> Option<f64> {
        match self {
            Segment::Ramp(r) => r.end_temp_c,
            Segment::Hold(h) => h.temp_c,
            Segment::Step(s) => s.temp_c,
            Segment::Rejected(_) => None,
        }
    }
}

/// Reflow profile document
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Profile {
    /// Display metadata
    #[cfg_attr(feature = "serde", serde(default))]
    pub meta: ProfileMeta,
    /// Safety reference limits
    #[cfg_attr(feature = "serde", serde(default))]
    pub safety: SafetyLimits,
    /// Segments in execution order
    #[cfg_attr(feature = "serde", serde(default))]
    pub segments: Vec<Segment>,
}

impl Profile {
    /// Create an empty profile with the given name
    pub fn new(name: &str) -> Self {
        Self {
            meta: ProfileMeta {
                name: String::from(name),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Builder-style segment append
    pub fn with_segment(mut self, segment: Segment) -> Self {
        self.segments.push(segment);
        self
    }

    /// Check whether any entry failed to decode
    pub fn has_rejected_segments(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Rejected(_)))
    }
}
