//! Property tests for the kinematic state, run without any hardware.

use proptest::prelude::*;
use stepper_ramp::{KinematicState, MotionLimits, Segment};

#[derive(Debug, Clone, Copy)]
struct Sample {
    emitted_in: Segment,
    planned: Segment,
    speed: f32,
    interval_ns: u64,
}

/// Fire every step exactly when due until the move ends.
fn run(state: &mut KinematicState) -> Vec<Sample> {
    let mut samples = Vec::new();
    while state.is_running() {
        let now = state.next_step_due_ns();
        assert!(state.is_step_due(now));
        let emitted_in = state.segment();
        let plan = state.commit_step(now);
        samples.push(Sample {
            emitted_in,
            planned: plan.segment,
            speed: plan.velocity,
            interval_ns: plan.interval_ns,
        });
    }
    samples
}

fn distance() -> impl Strategy<Value = i64> {
    prop_oneof![-4000i64..=-1, 1i64..=4000]
}

proptest! {
    #[test]
    fn prop_move_ends_at_target_at_rest(
        steps in distance(),
        max_velocity in 10.0f32..20_000.0,
        acceleration in 10.0f32..50_000.0,
        start in -10_000i64..10_000,
    ) {
        let mut state = KinematicState::new(MotionLimits::new(max_velocity, acceleration));
        state.set_current_position(start);
        state.move_by(steps);
        prop_assert_eq!(state.target_position(), start + steps);

        let samples = run(&mut state);

        prop_assert_eq!(samples.len() as u64, steps.unsigned_abs());
        prop_assert_eq!(state.current_position(), start + steps);
        prop_assert_eq!(state.velocity(), 0.0);
        prop_assert_eq!(state.segment(), Segment::Idle);
        prop_assert!(!state.is_step_due(u64::MAX));
    }

    #[test]
    fn prop_velocity_bounded_and_monotonic_per_segment(
        steps in distance(),
        max_velocity in 10.0f32..20_000.0,
        acceleration in 10.0f32..50_000.0,
    ) {
        let mut state = KinematicState::new(MotionLimits::new(max_velocity, acceleration));
        state.move_by(steps);
        let samples = run(&mut state);

        prop_assert_eq!(samples[0].emitted_in, Segment::Accelerating);

        let mut previous = 0.0f32;
        for sample in &samples {
            prop_assert!(sample.speed <= max_velocity);
            match sample.planned {
                Segment::Accelerating => prop_assert!(sample.speed >= previous),
                Segment::Decelerating => prop_assert!(sample.speed <= previous),
                Segment::Cruising => prop_assert_eq!(sample.speed, previous),
                Segment::Idle => prop_assert_eq!(sample.speed, 0.0),
            }
            if sample.planned != Segment::Idle {
                prop_assert!(sample.interval_ns > 0);
            }
            previous = sample.speed;
        }
    }

    #[test]
    fn prop_segment_counts_add_up(
        steps in distance(),
        max_velocity in 10.0f32..20_000.0,
        acceleration in 10.0f32..50_000.0,
    ) {
        let mut state = KinematicState::new(MotionLimits::new(max_velocity, acceleration));
        state.move_by(steps);
        let samples = run(&mut state);

        let count = |segment: Segment| samples.iter().filter(|s| s.emitted_in == segment).count() as u64;
        prop_assert_eq!(count(Segment::Idle), 0);
        prop_assert_eq!(
            count(Segment::Accelerating) + count(Segment::Cruising) + count(Segment::Decelerating),
            steps.unsigned_abs()
        );
    }

    #[test]
    fn prop_reconfiguring_mid_move_still_lands_on_target(
        steps in 200i64..3000,
        split in 1usize..150,
        acceleration in 100.0f32..20_000.0,
        new_acceleration in 100.0f32..20_000.0,
        new_max_velocity in 50.0f32..5000.0,
    ) {
        let mut state = KinematicState::new(MotionLimits::new(2000.0, acceleration));
        state.move_by(steps);

        for _ in 0..split {
            let now = state.next_step_due_ns();
            state.commit_step(now);
        }
        let before = state.speed();
        state.configure(new_max_velocity, new_acceleration);

        let samples = run(&mut state);
        if let Some(first) = samples.first() {
            // no jump larger than one step at either acceleration
            let limit = 2.0 * acceleration.max(new_acceleration) * 1.001;
            prop_assert!((first.speed * first.speed - before * before).abs() <= limit);
        }
        prop_assert_eq!(state.current_position(), steps);
        prop_assert_eq!(state.velocity(), 0.0);
    }

    #[test]
    fn prop_reversal_ends_at_new_target(
        steps in 50i64..2000,
        split in 1usize..50,
        back in -3000i64..-1,
        acceleration in 100.0f32..20_000.0,
    ) {
        let mut state = KinematicState::new(MotionLimits::new(3000.0, acceleration));
        state.move_by(steps);
        for _ in 0..split {
            let now = state.next_step_due_ns();
            state.commit_step(now);
        }

        let target = state.current_position() + back;
        state.move_by(back);
        prop_assert_eq!(state.target_position(), target);

        run(&mut state);
        prop_assert_eq!(state.current_position(), target);
        prop_assert_eq!(state.velocity(), 0.0);
    }
}
