//! Test doubles shared by the integration and unit test targets.

#![allow(dead_code)]

use std::cell::Cell;
use std::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin};
use embedded_hal_mock::eh1::delay::NoopDelay;
use stepper_ramp::{Clock, Segment, StepperMotor};

/// Output pin that records every level written to it.
#[derive(Debug, Default)]
pub struct RecordingPin {
    pub levels: Vec<bool>,
}

impl RecordingPin {
    pub fn last(&self) -> Option<bool> {
        self.levels.last().copied()
    }
}

impl ErrorType for RecordingPin {
    type Error = Infallible;
}

impl OutputPin for RecordingPin {
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.levels.push(true);
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.levels.push(false);
        Ok(())
    }
}

/// Clock that only moves when the test says so.
pub struct ManualClock<'a> {
    ticks: &'a Cell<u64>,
    reads: &'a Cell<u32>,
}

impl<'a> ManualClock<'a> {
    pub fn new(ticks: &'a Cell<u64>, reads: &'a Cell<u32>) -> Self {
        Self { ticks, reads }
    }
}

impl Clock for ManualClock<'_> {
    fn now_ns(&self) -> u64 {
        self.reads.set(self.reads.get() + 1);
        self.ticks.get()
    }
}

pub type TestMotor<'a> = StepperMotor<RecordingPin, RecordingPin, NoopDelay, ManualClock<'a>>;

pub fn test_motor<'a>(
    ticks: &'a Cell<u64>,
    reads: &'a Cell<u32>,
    max_velocity: f32,
    acceleration: f32,
) -> TestMotor<'a> {
    StepperMotor::builder()
        .name("x")
        .step_pin(RecordingPin::default())
        .dir_pin(RecordingPin::default())
        .delay(NoopDelay::new())
        .clock(ManualClock::new(ticks, reads))
        .max_velocity(max_velocity)
        .acceleration(acceleration)
        .build()
        .unwrap()
}

/// One emitted step as seen from outside the motor.
#[derive(Debug, Clone, Copy)]
pub struct StepRecord {
    /// Segment the step was emitted in.
    pub emitted_in: Segment,
    /// Segment planned for the following step.
    pub planned: Segment,
    /// Velocity magnitude after the step.
    pub speed: f32,
    pub position: i64,
    pub remaining: u64,
    pub time_ns: u64,
}

/// Advance the clock to each due time and emit one step, until the move ends.
pub fn step_once(motor: &mut TestMotor<'_>, ticks: &Cell<u64>) -> StepRecord {
    let emitted_in = motor.segment();
    ticks.set(ticks.get().max(motor.state().next_step_due_ns()));
    let time_ns = ticks.get();
    assert!(motor.run_once().unwrap(), "step was due but not emitted");
    StepRecord {
        emitted_in,
        planned: motor.segment(),
        speed: motor.state().speed(),
        position: motor.current_position_steps(),
        remaining: motor.distance_to_go(),
        time_ns,
    }
}

pub fn drive(motor: &mut TestMotor<'_>, ticks: &Cell<u64>) -> Vec<StepRecord> {
    let mut trace = Vec::new();
    while motor.is_running() {
        trace.push(step_once(motor, ticks));
    }
    trace
}
