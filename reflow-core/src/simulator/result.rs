//! Simulation output types

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use crate::profile::{SegmentDecodeError, SegmentKind};

/// One point of the simulated trace
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
    /// Elapsed time since profile start (seconds)
    pub time_s: f64,
    /// Target temperature (°C)
    pub temp_c: f64,
}

impl Sample {
    pub const fn new(time_s: f64, temp_c: f64) -> Self {
        Self { time_s, temp_c }
    }
}

/// Time and temperature extent of one simulated segment
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SegmentSpan {
    /// Segment index in the profile (0-based)
    pub index: usize,
    /// Segment kind
    pub kind: SegmentKind,
    /// Cursor when the segment began
    pub start: Sample,
    /// First point of the segment's own trajectory
    ///
    /// Differs from `start` only when the segment opens with an
    /// instantaneous jump (hold to a new temperature, step).
    pub entry: Sample,
    /// Cursor when the segment ended
    pub end: Sample,
}

impl SegmentSpan {
    /// Time spent in this segment (seconds)
    pub fn duration_s(&self) -> f64 {
        self.end.time_s - self.start.time_s
    }

    /// Check if the segment opens with an instantaneous jump
    pub fn has_jump(&self) -> bool {
        self.entry.temp_c != self.start.temp_c
    }
}

/// Cause of a segment failure
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentErrorKind {
    /// Document entry could not be decoded
    Rejected(SegmentDecodeError),
    /// Field holds NaN or infinity
    NonFiniteField { field: &'static str },
    /// Hold duration below zero
    NegativeDuration { duration_s: f64 },
    /// Segment duration overflowed
    NonFiniteDuration,
    /// Trace would exceed the configured sample budget
    SampleBudgetExceeded { limit: usize },
}

impl fmt::Display for SegmentErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentErrorKind::Rejected(cause) => write!(f, "{}", cause),
            SegmentErrorKind::NonFiniteField { field } => {
                write!(f, "field '{}' is not a finite number", field)
            }
            SegmentErrorKind::NegativeDuration { duration_s } => {
                write!(f, "negative duration {}s", duration_s)
            }
            SegmentErrorKind::NonFiniteDuration => write!(f, "duration is not finite"),
            SegmentErrorKind::SampleBudgetExceeded { limit } => {
                write!(f, "trace exceeds {} samples", limit)
            }
        }
    }
}

/// First segment failure of a simulation
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentError {
    /// Failing segment index (0-based)
    pub index: usize,
    /// Failure cause
    pub kind: SegmentErrorKind,
}

impl SegmentError {
    /// Failing segment position as shown to users (1-based)
    pub fn position(&self) -> usize {
        self.index + 1
    }
}

impl fmt::Display for SegmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Segment {}: {}", self.position(), self.kind)
    }
}

/// Result of simulating a profile
///
/// On failure `samples` and `spans` hold everything computed before the
/// failing segment.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    /// Trace, non-decreasing in time, starting at the ambient sample
    pub samples: Vec<Sample>,
    /// Extent of every successfully simulated segment
    pub spans: Vec<SegmentSpan>,
    /// First segment failure, if any
    pub error: Option<SegmentError>,
}

impl SimulationResult {
    pub(crate) fn starting_at(origin: Sample) -> Self {
        let mut samples = Vec::new();
        samples.push(origin);
        Self {
            samples,
            spans: Vec::new(),
            error: None,
        }
    }

    /// Check if every segment simulated successfully
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    /// User-facing error text, e.g. `"Segment 2: duration is not finite"`
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(|e| e.to_string())
    }

    /// Time of the last sample (seconds)
    pub fn duration_s(&self) -> f64 {
        self.samples.last().map(|s| s.time_s).unwrap_or(0.0)
    }

    /// Hottest sample; the earliest one on ties
    pub fn peak(&self) -> Option<Sample> {
        self.samples.iter().copied().fold(None, |peak, s| match peak {
            Some(p) if p.temp_c >= s.temp_c => Some(p),
            _ => Some(s),
        })
    }

    /// Sample times as a separate series, for plotting
    pub fn times(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.time_s).collect()
    }

    /// Sample temperatures as a separate series, for plotting
    pub fn temperatures(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.temp_c).collect()
    }
}
