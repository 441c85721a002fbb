//! Reflow profile model
//!
//! A profile is an ordered list of segments. Segment order is execution
//! order: each segment starts where the previous one ended.

pub mod decode;
pub mod presets;
pub mod types;

pub use decode::{ExtraFields, RawSegment, Scalar, SegmentDecodeError};
pub use types::*;
