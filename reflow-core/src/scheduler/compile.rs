//! Compiled firmware trajectory
//!
//! The simulated trace is piecewise linear, so the firmware only needs the
//! vertices: every segment contributes its entry point (when it jumps) and
//! its end point. The compiled form is fixed-capacity and uses the same
//! fixed-point units as the heater controllers (ms, °C × 10).

use heapless::{String, Vec};

use crate::profile::{Profile, SegmentKind};
use crate::simulator::{Sample, SimulationResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum segments in a compiled profile
pub const MAX_PROFILE_SEGMENTS: usize = 20;

/// Maximum waypoints: origin plus entry and end of every segment
pub const MAX_WAYPOINTS: usize = 2 * MAX_PROFILE_SEGMENTS + 1;

/// Maximum profile name length
pub const MAX_NAME_LEN: usize = 32;

/// Maximum segment note length
pub const MAX_NOTE_LEN: usize = 16;

/// Compilation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CompileError {
    /// Simulation failed at this segment index; nothing to compile
    InvalidSimulation(usize),
    /// Profile has more than [`MAX_PROFILE_SEGMENTS`] segments
    TooManySegments,
    /// Trajectory needs more than [`MAX_WAYPOINTS`] vertices
    TooManyWaypoints,
    /// Time or temperature does not fit the fixed-point range
    OutOfRange,
}

/// Trajectory vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Waypoint {
    /// Elapsed time since profile start (ms)
    pub time_ms: u32,
    /// Target temperature (°C × 10)
    pub temp_x10: i16,
}

impl Waypoint {
    fn from_sample(sample: Sample) -> Result<Self, CompileError> {
        let time_ms = sample.time_s * 1000.0;
        let temp_x10 = sample.temp_c * 10.0;
        if !(0.0..=u32::MAX as f64).contains(&time_ms)
            || !(i16::MIN as f64..=i16::MAX as f64).contains(&temp_x10)
        {
            return Err(CompileError::OutOfRange);
        }

        Ok(Self {
            time_ms: (time_ms + 0.5) as u32,
            temp_x10: round_i16(temp_x10),
        })
    }
}

/// Round half away from zero; the cast saturates at the i16 limits
fn round_i16(value: f64) -> i16 {
    if value < 0.0 {
        (value - 0.5) as i16
    } else {
        (value + 0.5) as i16
    }
}

/// Segment timing within the compiled trajectory
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CompiledSegment {
    /// Segment kind
    pub kind: SegmentKind,
    /// Segment start (ms)
    pub start_ms: u32,
    /// Segment end (ms)
    pub end_ms: u32,
    /// Free-text label, truncated
    pub note: String<MAX_NOTE_LEN>,
}

/// Fixed-capacity reference trajectory for oven firmware
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CompiledProfile {
    /// Display name, truncated
    pub name: String<MAX_NAME_LEN>,
    /// Maximum temperature (°C × 10)
    pub max_temp_x10: i16,
    /// Segments in execution order
    pub segments: Vec<CompiledSegment, MAX_PROFILE_SEGMENTS>,
    /// Trajectory vertices, non-decreasing in time
    pub waypoints: Vec<Waypoint, MAX_WAYPOINTS>,
}

/// Copy as many whole characters as fit
fn truncated<const N: usize>(text: &str) -> String<N> {
    let mut out = String::new();
    for c in text.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

impl CompiledProfile {
    /// Compile a profile and its simulation
    ///
    /// `result` must come from simulating `profile`.
    pub fn compile(profile: &Profile, result: &SimulationResult) -> Result<Self, CompileError> {
        if let Some(error) = &result.error {
            return Err(CompileError::InvalidSimulation(error.index));
        }
        if result.spans.len() > MAX_PROFILE_SEGMENTS {
            return Err(CompileError::TooManySegments);
        }

        let max_temp_x10 = sample_temp_x10(profile.safety.max_temp_c)?;
        let mut compiled = Self {
            name: truncated(&profile.meta.name),
            max_temp_x10,
            segments: Vec::new(),
            waypoints: Vec::new(),
        };

        if let Some(origin) = result.samples.first() {
            compiled.push_waypoint(Waypoint::from_sample(*origin)?)?;
        }

        for span in &result.spans {
            let entry = Waypoint::from_sample(span.entry)?;
            let end = Waypoint::from_sample(span.end)?;
            let start = Waypoint::from_sample(span.start)?;

            compiled.push_waypoint(entry)?;
            compiled.push_waypoint(end)?;

            let note = profile
                .segments
                .get(span.index)
                .map(|s| s.note())
                .unwrap_or("");
            compiled
                .segments
                .push(CompiledSegment {
                    kind: span.kind,
                    start_ms: start.time_ms,
                    end_ms: end.time_ms,
                    note: truncated(note),
                })
                .map_err(|_| CompileError::TooManySegments)?;
        }

        Ok(compiled)
    }

    /// Append a vertex unless it repeats the previous one
    fn push_waypoint(&mut self, waypoint: Waypoint) -> Result<(), CompileError> {
        if self.waypoints.last() == Some(&waypoint) {
            return Ok(());
        }
        self.waypoints
            .push(waypoint)
            .map_err(|_| CompileError::TooManyWaypoints)
    }

    /// Total trajectory duration (ms)
    pub fn duration_ms(&self) -> u32 {
        self.waypoints.last().map(|w| w.time_ms).unwrap_or(0)
    }

    /// Target temperature at `time_ms` (°C × 10)
    ///
    /// At a discontinuity the post-jump temperature wins. Returns None past
    /// the end of the trajectory.
    pub fn setpoint_at(&self, time_ms: u32) -> Option<i16> {
        let count = self.waypoints.partition_point(|w| w.time_ms <= time_ms);
        let from = self.waypoints.get(count.checked_sub(1)?)?;

        match self.waypoints.get(count) {
            Some(to) => {
                let span = (to.time_ms - from.time_ms) as i64;
                let offset = (time_ms - from.time_ms) as i64;
                let delta = to.temp_x10 as i64 - from.temp_x10 as i64;
                Some((from.temp_x10 as i64 + delta * offset / span) as i16)
            }
            None if time_ms == from.time_ms => Some(from.temp_x10),
            None => None,
        }
    }

    /// Index of the segment active at `time_ms`
    ///
    /// Zero-duration segments are never active.
    pub fn segment_at(&self, time_ms: u32) -> Option<usize> {
        self.segments.iter().position(|s| s.end_ms > time_ms)
    }
}

fn sample_temp_x10(temp_c: f64) -> Result<i16, CompileError> {
    Waypoint::from_sample(Sample::new(0.0, temp_c)).map(|w| w.temp_x10)
}
