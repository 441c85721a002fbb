//! Profile walk
//!
//! Folds the per-segment traces into one result, stopping at the first
//! failing segment.

use super::rasterize::rasterize;
use super::result::{Sample, SegmentError, SegmentSpan, SimulationResult};
use crate::config::SimulatorConfig;
use crate::profile::Profile;

/// Simulate a profile with the default configuration
pub fn simulate(profile: &Profile) -> SimulationResult {
    simulate_with(profile, &SimulatorConfig::default())
}

/// Simulate a profile
///
/// The trace starts at `(0, config.ambient_c)`. Segments are processed in
/// order; the first failure is recorded in [`SimulationResult::error`] and
/// the trace accumulated so far is returned with it. Never panics.
pub fn simulate_with(profile: &Profile, config: &SimulatorConfig) -> SimulationResult {
    let origin = Sample::new(0.0, config.ambient_c);
    let mut result = SimulationResult::starting_at(origin);
    let mut cursor = origin;

    for (index, segment) in profile.segments.iter().enumerate() {
        let budget = config.max_samples.saturating_sub(result.samples.len());

        match rasterize(segment, cursor, config, budget) {
            Ok(trace) => {
                result.spans.push(SegmentSpan {
                    index,
                    kind: trace.kind,
                    start: cursor,
                    entry: trace.entry,
                    end: trace.end,
                });
                result.samples.extend(trace.samples);
                cursor = trace.end;
            }
            Err(kind) => {
                result.error = Some(SegmentError { index, kind });
                break;
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{RawSegment, Scalar, Segment, SegmentDecodeError, SegmentKind};
    use crate::simulator::SegmentErrorKind;

    const EPSILON: f64 = 1e-9;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPSILON,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    fn profile_of(segments: &[Segment]) -> Profile {
        let mut profile = Profile::new("Test");
        profile.segments.extend_from_slice(segments);
        profile
    }

    #[test]
    fn test_empty_profile() {
        let result = simulate(&Profile::default());
        assert_eq!(result.samples, [Sample::new(0.0, 25.0)]);
        assert!(result.is_valid());
        assert!(result.spans.is_empty());
    }

    #[test]
    fn test_single_ramp() {
        let result = simulate(&profile_of(&[Segment::ramp(125.0, 2.0)]));

        assert!(result.is_valid());
        assert!(result.samples.len() >= 2);
        assert_eq!(result.samples[0], Sample::new(0.0, 25.0));
        assert_eq!(*result.samples.last().unwrap(), Sample::new(50.0, 125.0));

        for pair in result.samples.windows(2) {
            assert!(pair[1].time_s > pair[0].time_s);
            assert!(pair[1].temp_c > pair[0].temp_c);
        }
        for sample in &result.samples {
            assert_close(sample.temp_c, 25.0 + 2.0 * sample.time_s);
        }
    }

    #[test]
    fn test_zero_slope_uses_floor_rate() {
        let result = simulate(&profile_of(&[Segment::ramp(100.0, 0.0)]));

        assert!(result.is_valid());
        let last = *result.samples.last().unwrap();
        assert_close(last.time_s, 750.0);
        assert_eq!(last.temp_c, 100.0);
        assert!((749..=750).contains(&result.samples.len()));
    }

    #[test]
    fn test_hold_with_jump() {
        let result = simulate(&profile_of(&[Segment::hold(150.0, 60.0)]));
        assert_eq!(
            result.samples,
            [
                Sample::new(0.0, 25.0),
                Sample::new(0.0, 150.0),
                Sample::new(60.0, 150.0),
            ]
        );
    }

    #[test]
    fn test_hold_without_jump() {
        let result = simulate(&profile_of(&[Segment::hold(25.0, 60.0)]));
        assert_eq!(
            result.samples,
            [Sample::new(0.0, 25.0), Sample::new(60.0, 25.0)]
        );
    }

    #[test]
    fn test_step_contributes_one_sample() {
        let result = simulate(&profile_of(&[
            Segment::hold(25.0, 10.0),
            Segment::step(180.0),
        ]));
        assert_eq!(result.samples.len(), 3);
        assert_eq!(result.samples[2], Sample::new(10.0, 180.0));
        assert_eq!(result.spans[1].kind, SegmentKind::Step);
        assert_eq!(result.spans[1].duration_s(), 0.0);
    }

    #[test]
    fn test_boundary_continuity() {
        let result = simulate(&Profile::sac305());
        assert!(result.is_valid());
        assert_eq!(result.spans.len(), 6);

        for pair in result.spans.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        assert_eq!(result.spans[0].start, Sample::new(0.0, 25.0));
        assert_eq!(*result.samples.last().unwrap(), result.spans[5].end);
        assert_eq!(result.spans[5].end.temp_c, 50.0);
    }

    #[test]
    fn test_sac305_timeline() {
        let result = simulate(&Profile::sac305());
        let ends: Vec<f64> = result.spans.iter().map(|s| s.end.time_s).collect();

        // 125/1.5, +90, +67/2.5, +28/1.0, +20, +195/2.0
        let expected = [
            83.333333333,
            173.333333333,
            200.133333333,
            228.133333333,
            248.133333333,
            345.633333333,
        ];
        for (actual, expected) in ends.iter().zip(expected) {
            assert!((actual - expected).abs() < 1e-6);
        }
        assert_eq!(result.peak().unwrap().temp_c, 245.0);
    }

    #[test]
    fn test_fail_fast_keeps_partial_trace() {
        let bad = Segment::from_raw(RawSegment {
            end_temp: Some(Scalar::Text("hot".into())),
            ..RawSegment::tagged("ramp")
        });
        let profile = profile_of(&[Segment::hold(150.0, 60.0), bad, Segment::step(20.0)]);

        let result = simulate(&profile);
        let reference = simulate(&profile_of(&[Segment::hold(150.0, 60.0)]));

        assert!(!result.is_valid());
        assert_eq!(result.samples, reference.samples);
        assert_eq!(result.spans.len(), 1);

        let error = result.error.as_ref().unwrap();
        assert_eq!(error.position(), 2);
        assert_eq!(
            error.kind,
            SegmentErrorKind::Rejected(SegmentDecodeError::NotNumeric {
                field: "end_temp",
                value: "hot".into(),
            })
        );
        assert!(result.error_message().unwrap().starts_with("Segment 2: "));
    }

    #[test]
    fn test_unknown_type_fails_at_its_index() {
        let profile = profile_of(&[
            Segment::ramp(100.0, 1.0),
            Segment::step(120.0),
            Segment::from_raw(RawSegment::tagged("soak")),
        ]);
        let result = simulate(&profile);

        assert_eq!(
            result.error_message().as_deref(),
            Some("Segment 3: unknown segment type 'soak'")
        );
        assert_eq!(*result.samples.last().unwrap(), Sample::new(75.0, 120.0));
    }

    #[test]
    fn test_sample_budget() {
        let config = SimulatorConfig {
            max_samples: 100,
            ..Default::default()
        };
        let profile = profile_of(&[Segment::ramp(75.0, 1.0), Segment::ramp(175.0, 1.0)]);
        let result = simulate_with(&profile, &config);

        // First ramp: 1 + 49 samples; second would need 99 more
        assert_eq!(result.samples.len(), 50);
        assert_eq!(
            result.error.unwrap().kind,
            SegmentErrorKind::SampleBudgetExceeded { limit: 100 }
        );
    }

    #[test]
    fn test_huge_ramp_fails_without_allocating() {
        let result = simulate(&profile_of(&[Segment::ramp(1e12, 1e-3)]));
        assert!(matches!(
            result.error.unwrap().kind,
            SegmentErrorKind::SampleBudgetExceeded { .. }
        ));
        assert_eq!(result.samples.len(), 1);
    }

    #[test]
    fn test_custom_ambient_and_density() {
        let config = SimulatorConfig {
            ambient_c: 20.0,
            samples_per_second: 4.0,
            ..Default::default()
        };
        let result = simulate_with(&profile_of(&[Segment::ramp(30.0, 1.0)]), &config);

        assert_eq!(result.samples[0], Sample::new(0.0, 20.0));
        // 10 s at 4 samples/s = 40 samples, first one shared
        assert_eq!(result.samples.len(), 40);
    }

    #[test]
    fn test_input_not_mutated_and_deterministic() {
        let profile = Profile::sac305();
        let snapshot = profile.clone();

        let first = simulate(&profile);
        let second = simulate(&profile);

        assert_eq!(profile, snapshot);
        let bits = |r: &SimulationResult| -> Vec<(u64, u64)> {
            r.samples
                .iter()
                .map(|s| (s.time_s.to_bits(), s.temp_c.to_bits()))
                .collect()
        };
        assert_eq!(bits(&first), bits(&second));
    }
}
