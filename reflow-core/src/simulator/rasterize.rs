//! Per-segment trace generation
//!
//! Each segment is rasterized independently from the cursor left behind by
//! the previous one. A segment never re-emits the cursor sample itself, so
//! consecutive segments share exactly one boundary sample.

use alloc::vec::Vec;

use super::result::{Sample, SegmentErrorKind};
use crate::config::{SimulatorConfig, MIN_RAMP_SAMPLES};
use crate::profile::{Hold, Ramp, Segment, SegmentKind, Step};

/// Samples contributed by one segment
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SegmentTrace {
    pub kind: SegmentKind,
    /// Samples to append after the cursor sample
    pub samples: Vec<Sample>,
    /// First point of the segment's own trajectory
    pub entry: Sample,
    /// Cursor for the next segment
    pub end: Sample,
}

/// Absolute value without relying on std float intrinsics
fn magnitude(value: f64) -> f64 {
    if value < 0.0 {
        -value
    } else {
        value
    }
}

fn finite(field: &'static str, value: f64) -> Result<f64, SegmentErrorKind> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SegmentErrorKind::NonFiniteField { field })
    }
}

fn reserve(needed: usize, budget: usize, config: &SimulatorConfig) -> Result<(), SegmentErrorKind> {
    if needed > budget {
        Err(SegmentErrorKind::SampleBudgetExceeded {
            limit: config.max_samples,
        })
    } else {
        Ok(())
    }
}

/// Number of samples spanning a ramp, including its start sample
///
/// Float to integer casts saturate, so absurd durations land on
/// `usize::MAX` and fail the budget check instead of allocating.
pub(crate) fn ramp_sample_count(duration_s: f64, samples_per_second: f64) -> usize {
    let count = (duration_s * samples_per_second) as usize;
    count.max(MIN_RAMP_SAMPLES)
}

/// Rasterize one segment starting at `cursor`
///
/// `budget` is the number of samples the trace may still grow by.
pub(crate) fn rasterize(
    segment: &Segment,
    cursor: Sample,
    config: &SimulatorConfig,
    budget: usize,
) -> Result<SegmentTrace, SegmentErrorKind> {
    match segment {
        Segment::Ramp(ramp) => rasterize_ramp(ramp, cursor, config, budget),
        Segment::Hold(hold) => rasterize_hold(hold, cursor, config, budget),
        Segment::Step(step) => rasterize_step(step, cursor, config, budget),
        Segment::Rejected(rejected) => Err(SegmentErrorKind::Rejected(rejected.cause.clone())),
    }
}

fn rasterize_ramp(
    ramp: &Ramp,
    cursor: Sample,
    config: &SimulatorConfig,
    budget: usize,
) -> Result<SegmentTrace, SegmentErrorKind> {
    let end_temp = finite("end_temp", ramp.end_temp_c.unwrap_or(cursor.temp_c))?;
    let slope = finite("slope", ramp.slope_c_per_s)?;

    let rate = if slope == 0.0 {
        config.min_slope_c_per_s
    } else {
        magnitude(slope)
    };
    let span_c = end_temp - cursor.temp_c;
    let duration = magnitude(span_c) / rate;
    if !duration.is_finite() || !(cursor.time_s + duration).is_finite() {
        return Err(SegmentErrorKind::NonFiniteDuration);
    }

    let count = ramp_sample_count(duration, config.samples_per_second);
    reserve(count - 1, budget, config)?;

    let end = Sample::new(cursor.time_s + duration, end_temp);
    let last = (count - 1) as f64;
    let mut samples = Vec::with_capacity(count - 1);
    // Index 0 is the cursor itself and is already in the trace
    for k in 1..count - 1 {
        let fraction = k as f64 / last;
        samples.push(Sample::new(
            cursor.time_s + duration * fraction,
            cursor.temp_c + span_c * fraction,
        ));
    }
    samples.push(end);

    Ok(SegmentTrace {
        kind: SegmentKind::Ramp,
        samples,
        entry: cursor,
        end,
    })
}

fn rasterize_hold(
    hold: &Hold,
    cursor: Sample,
    config: &SimulatorConfig,
    budget: usize,
) -> Result<SegmentTrace, SegmentErrorKind> {
    let duration = finite("duration_s", hold.duration_s)?;
    if duration < 0.0 {
        return Err(SegmentErrorKind::NegativeDuration {
            duration_s: duration,
        });
    }
    let target = finite("temp", hold.temp_c.unwrap_or(cursor.temp_c))?;

    let end = Sample::new(cursor.time_s + duration, target);
    if !end.time_s.is_finite() {
        return Err(SegmentErrorKind::NonFiniteDuration);
    }

    let jumps = target != cursor.temp_c;
    reserve(if jumps { 2 } else { 1 }, budget, config)?;

    let entry = Sample::new(cursor.time_s, target);
    let mut samples = Vec::with_capacity(2);
    if jumps {
        samples.push(entry);
    }
    samples.push(end);

    Ok(SegmentTrace {
        kind: SegmentKind::Hold,
        samples,
        entry,
        end,
    })
}

fn rasterize_step(
    step: &Step,
    cursor: Sample,
    config: &SimulatorConfig,
    budget: usize,
) -> Result<SegmentTrace, SegmentErrorKind> {
    let target = finite("temp", step.temp_c.unwrap_or(cursor.temp_c))?;
    reserve(1, budget, config)?;

    let end = Sample::new(cursor.time_s, target);
    let mut samples = Vec::with_capacity(1);
    samples.push(end);

    Ok(SegmentTrace {
        kind: SegmentKind::Step,
        samples,
        entry: end,
        end,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{RawSegment, Segment};

    const ORIGIN: Sample = Sample::new(0.0, 25.0);

    fn run(segment: &Segment, cursor: Sample) -> Result<SegmentTrace, SegmentErrorKind> {
        let config = SimulatorConfig::default();
        rasterize(segment, cursor, &config, config.max_samples)
    }

    #[test]
    fn test_sample_count_floor() {
        assert_eq!(ramp_sample_count(0.0, 1.0), 2);
        assert_eq!(ramp_sample_count(1.9, 1.0), 2);
        assert_eq!(ramp_sample_count(50.0, 1.0), 50);
        assert_eq!(ramp_sample_count(50.7, 1.0), 50);
        assert_eq!(ramp_sample_count(10.0, 2.0), 20);
        assert_eq!(ramp_sample_count(f64::MAX, 1.0), usize::MAX);
    }

    #[test]
    fn test_ramp_skips_cursor_sample() {
        let trace = run(&Segment::ramp(125.0, 2.0), ORIGIN).unwrap();

        // 50 samples over [0, 50], first one dropped
        assert_eq!(trace.samples.len(), 49);
        assert_ne!(trace.samples[0], ORIGIN);
        assert_eq!(trace.end, Sample::new(50.0, 125.0));
        assert_eq!(*trace.samples.last().unwrap(), trace.end);
        assert_eq!(trace.entry, ORIGIN);
    }

    #[test]
    fn test_negative_slope_uses_magnitude() {
        let cursor = Sample::new(100.0, 245.0);
        let trace = run(&Segment::ramp(50.0, -2.0), cursor).unwrap();
        assert_eq!(trace.end, Sample::new(197.5, 50.0));
    }

    #[test]
    fn test_zero_length_ramp() {
        let trace = run(&Segment::ramp(25.0, 1.0), ORIGIN).unwrap();
        assert_eq!(trace.samples.len(), 1);
        assert_eq!(trace.end, ORIGIN);
    }

    #[test]
    fn test_ramp_without_target_holds_temperature() {
        let segment = Segment::from_raw(RawSegment::tagged("ramp"));
        let trace = run(&segment, Sample::new(5.0, 80.0)).unwrap();
        assert_eq!(trace.end, Sample::new(5.0, 80.0));
    }

    #[test]
    fn test_hold_jump_and_dwell() {
        let trace = run(&Segment::hold(150.0, 60.0), ORIGIN).unwrap();
        assert_eq!(
            trace.samples,
            [Sample::new(0.0, 150.0), Sample::new(60.0, 150.0)]
        );
        assert_eq!(trace.entry, Sample::new(0.0, 150.0));
    }

    #[test]
    fn test_hold_at_current_temperature() {
        let trace = run(&Segment::hold(25.0, 30.0), ORIGIN).unwrap();
        assert_eq!(trace.samples, [Sample::new(30.0, 25.0)]);
        assert_eq!(trace.entry, Sample::new(0.0, 25.0));
    }

    #[test]
    fn test_negative_hold_rejected() {
        let err = run(&Segment::hold(100.0, -5.0), ORIGIN).unwrap_err();
        assert_eq!(err, SegmentErrorKind::NegativeDuration { duration_s: -5.0 });
    }

    #[test]
    fn test_step_is_instant() {
        let trace = run(&Segment::step(200.0), Sample::new(12.0, 25.0)).unwrap();
        assert_eq!(trace.samples, [Sample::new(12.0, 200.0)]);
        assert_eq!(trace.end, Sample::new(12.0, 200.0));
    }

    #[test]
    fn test_non_finite_fields() {
        let err = run(&Segment::ramp(f64::NAN, 1.0), ORIGIN).unwrap_err();
        assert_eq!(err, SegmentErrorKind::NonFiniteField { field: "end_temp" });

        let err = run(&Segment::ramp(100.0, f64::INFINITY), ORIGIN).unwrap_err();
        assert_eq!(err, SegmentErrorKind::NonFiniteField { field: "slope" });

        let err = run(&Segment::hold(f64::NEG_INFINITY, 1.0), ORIGIN).unwrap_err();
        assert_eq!(err, SegmentErrorKind::NonFiniteField { field: "temp" });
    }

    #[test]
    fn test_overflowing_duration() {
        let err = run(&Segment::ramp(f64::MAX, 1e-300), ORIGIN).unwrap_err();
        assert_eq!(err, SegmentErrorKind::NonFiniteDuration);
    }

    #[test]
    fn test_budget_checked_before_allocating() {
        let config = SimulatorConfig::default();
        let err = rasterize(&Segment::ramp(125.0, 2.0), ORIGIN, &config, 10).unwrap_err();
        assert_eq!(
            err,
            SegmentErrorKind::SampleBudgetExceeded {
                limit: config.max_samples
            }
        );

        let err = rasterize(&Segment::step(100.0), ORIGIN, &config, 0).unwrap_err();
        assert!(matches!(err, SegmentErrorKind::SampleBudgetExceeded { .. }));
    }
}
