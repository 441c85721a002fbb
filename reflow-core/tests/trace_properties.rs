//! Property tests over randomly generated profiles

use proptest::prelude::*;
use reflow_core::scheduler::{CompiledProfile, Event, ExecutionPhase, Scheduler};
use reflow_core::{simulate, Profile, Sample, Segment};

fn slope() -> impl Strategy<Value = f64> {
    prop_oneof![Just(0.0), 0.1..5.0f64, -5.0..-0.1f64]
}

fn segment() -> impl Strategy<Value = Segment> {
    prop_oneof![
        (0.0..300.0f64, slope()).prop_map(|(temp, slope)| Segment::ramp(temp, slope)),
        (0.0..300.0f64, 0.0..120.0f64).prop_map(|(temp, duration)| Segment::hold(temp, duration)),
        (0.0..300.0f64).prop_map(Segment::step),
    ]
}

fn profile() -> impl Strategy<Value = Profile> {
    prop::collection::vec(segment(), 0..8).prop_map(|segments| {
        let mut profile = Profile::new("Random");
        profile.segments = segments;
        profile
    })
}

proptest! {
    #[test]
    fn trace_is_well_formed(profile in profile()) {
        let result = simulate(&profile);

        prop_assert!(result.is_valid());
        prop_assert_eq!(result.samples[0], Sample::new(0.0, 25.0));
        prop_assert_eq!(result.spans.len(), profile.segments.len());

        for pair in result.samples.windows(2) {
            prop_assert!(pair[1].time_s >= pair[0].time_s);
        }
        for pair in result.spans.windows(2) {
            prop_assert_eq!(pair[0].end, pair[1].start);
        }
        if let Some(last) = result.spans.last() {
            prop_assert_eq!(*result.samples.last().unwrap(), last.end);
        }
    }

    #[test]
    fn simulation_is_deterministic(profile in profile()) {
        prop_assert_eq!(simulate(&profile), simulate(&profile));
    }

    #[test]
    fn scheduler_walks_segments_in_order(profile in profile()) {
        let result = simulate(&profile);
        let compiled = CompiledProfile::compile(&profile, &result).unwrap();
        let duration_ms = compiled.duration_ms();

        let mut sched = Scheduler::new();
        prop_assert!(sched.load(compiled));

        let mut last_index = None;
        let mut event = sched.start();
        let mut ticks = 0u32;
        loop {
            match event {
                Some(Event::SegmentStarted(index)) => {
                    prop_assert!(last_index.map_or(true, |last| index > last));
                    last_index = Some(index);
                }
                Some(Event::ProfileFinished) => break,
                None => {}
            }
            prop_assert!(ticks <= duration_ms / 1000 + 1);
            event = sched.tick(1000);
            ticks += 1;
        }

        prop_assert_eq!(sched.phase(), ExecutionPhase::Complete);
        prop_assert!(sched.heater_command().target_temp_x10.is_none());
    }
}
