//! Safety report for a simulated trace
//!
//! Flags segments that climb above the maximum temperature and ramps
//! steeper than the advisory slope bound.

use alloc::vec::Vec;

use crate::profile::{SafetyLimits, SegmentKind};
use crate::simulator::{Sample, SegmentSpan, SimulationResult};

/// Relative slack applied to the slope bound
///
/// A ramp authored at exactly `max_slope` must not be flagged because of
/// rounding in `Δ / (Δ / slope)`.
pub const SLOPE_TOLERANCE: f64 = 1e-9;

/// Single safety limit violation
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SafetyFinding {
    /// Segment reaches a temperature above `max_temp`
    OverTemperature { segment: usize, temp_c: f64 },
    /// Ramp rate above `max_slope`
    SlopeExceeded { segment: usize, rate_c_per_s: f64 },
}

impl SafetyFinding {
    /// Offending segment index (0-based)
    pub fn segment(&self) -> usize {
        match self {
            SafetyFinding::OverTemperature { segment, .. } => *segment,
            SafetyFinding::SlopeExceeded { segment, .. } => *segment,
        }
    }
}

/// Overall safety status
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SafetyStatus {
    /// All limits respected
    Ok,
    /// First violation found, in segment order
    Fault(SafetyFinding),
}

/// Safety analysis of one simulation
#[derive(Debug, Clone, PartialEq)]
pub struct SafetyReport {
    /// Hottest point of the trace
    pub peak: Option<Sample>,
    /// Steepest ramp rate (°C/s), zero without ramps
    pub steepest_ramp_c_per_s: f64,
    /// Violations in segment order
    pub findings: Vec<SafetyFinding>,
}

fn ramp_rate(span: &SegmentSpan) -> Option<f64> {
    let duration = span.duration_s();
    if span.kind != SegmentKind::Ramp || duration <= 0.0 {
        return None;
    }
    let delta = span.end.temp_c - span.start.temp_c;
    let magnitude = if delta < 0.0 { -delta } else { delta };
    Some(magnitude / duration)
}

impl SafetyReport {
    /// Analyze the simulated part of a trace
    ///
    /// Only successfully simulated segments are covered; an invalid result
    /// is analyzed up to its failing segment.
    pub fn analyze(result: &SimulationResult, limits: &SafetyLimits) -> Self {
        let mut findings = Vec::new();
        let mut steepest: f64 = 0.0;

        for span in &result.spans {
            let hottest = if span.entry.temp_c > span.end.temp_c {
                span.entry.temp_c
            } else {
                span.end.temp_c
            };
            if hottest > limits.max_temp_c {
                findings.push(SafetyFinding::OverTemperature {
                    segment: span.index,
                    temp_c: hottest,
                });
            }

            if let Some(rate) = ramp_rate(span) {
                if rate > steepest {
                    steepest = rate;
                }
                if rate > limits.max_slope_c_per_s * (1.0 + SLOPE_TOLERANCE) {
                    findings.push(SafetyFinding::SlopeExceeded {
                        segment: span.index,
                        rate_c_per_s: rate,
                    });
                }
            }
        }

        Self {
            peak: result.peak(),
            steepest_ramp_c_per_s: steepest,
            findings,
        }
    }

    /// Check all findings
    ///
    /// Returns the first violation, or Ok if every limit holds.
    pub fn status(&self) -> SafetyStatus {
        match self.findings.first() {
            Some(finding) => SafetyStatus::Fault(*finding),
            None => SafetyStatus::Ok,
        }
    }

    /// Check if no limit is violated
    pub fn is_safe(&self) -> bool {
        self.findings.is_empty()
    }
}
