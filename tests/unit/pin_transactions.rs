//! Exact STEP/DIR pin traffic, checked against embedded-hal-mock expectations.

use std::cell::Cell;

use embedded_hal::digital::{ErrorKind, ErrorType, OutputPin};
use embedded_hal_mock::eh1::delay::NoopDelay;
use embedded_hal_mock::eh1::digital::{Mock as PinMock, State as PinState, Transaction as PinTransaction};
use stepper_ramp::error::MotorError;
use stepper_ramp::{Error, StepperMotor};

fn pulses(count: usize) -> Vec<PinTransaction> {
    (0..count)
        .flat_map(|_| {
            [
                PinTransaction::set(PinState::High),
                PinTransaction::set(PinState::Low),
            ]
        })
        .collect()
}

fn mock_motor<'a>(
    step: PinMock,
    dir: PinMock,
    ticks: &'a Cell<u64>,
    invert: bool,
) -> StepperMotor<PinMock, PinMock, NoopDelay, impl Fn() -> u64 + 'a> {
    StepperMotor::builder()
        .step_pin(step)
        .dir_pin(dir)
        .delay(NoopDelay::new())
        .clock(move || {
            let now = ticks.get();
            ticks.set(now + 100_000);
            now
        })
        .max_velocity(500.0)
        .acceleration(1000.0)
        .invert_direction(invert)
        .build()
        .unwrap()
}

#[test]
fn test_forward_move_sets_dir_high_once() {
    let ticks = Cell::new(0);
    let step = PinMock::new(&pulses(3));
    let dir = PinMock::new(&[PinTransaction::set(PinState::High)]);

    let mut motor = mock_motor(step, dir, &ticks, false);
    motor.move_by_blocking(3).unwrap();
    assert_eq!(motor.current_position_steps(), 3);

    let (mut step, mut dir, _, _) = motor.release();
    step.done();
    dir.done();
}

#[test]
fn test_direction_change_rewrites_dir() {
    let ticks = Cell::new(0);
    let step = PinMock::new(&pulses(4));
    let dir = PinMock::new(&[
        PinTransaction::set(PinState::Low),
        PinTransaction::set(PinState::High),
    ]);

    let mut motor = mock_motor(step, dir, &ticks, false);
    motor.move_by_blocking(-2).unwrap();
    motor.move_by_blocking(2).unwrap();
    assert_eq!(motor.current_position_steps(), 0);

    let (mut step, mut dir, _, _) = motor.release();
    step.done();
    dir.done();
}

#[test]
fn test_inverted_direction_swaps_levels() {
    let ticks = Cell::new(0);
    let step = PinMock::new(&pulses(2));
    let dir = PinMock::new(&[PinTransaction::set(PinState::Low)]);

    let mut motor = mock_motor(step, dir, &ticks, true);
    motor.move_to(2);
    motor.run_to_completion().unwrap();

    let (mut step, mut dir, _, _) = motor.release();
    step.done();
    dir.done();
}

#[test]
fn test_cancelled_move_emits_nothing() {
    let ticks = Cell::new(0);
    let none: [PinTransaction; 0] = [];
    let step = PinMock::new(&none);
    let dir = PinMock::new(&none);

    let mut motor = mock_motor(step, dir, &ticks, false);
    motor.move_by(100);
    motor.move_by(0);
    assert!(!motor.run_once().unwrap());

    let (mut step, mut dir, _, _) = motor.release();
    step.done();
    dir.done();
}

struct FailingPin;

impl ErrorType for FailingPin {
    type Error = ErrorKind;
}

impl OutputPin for FailingPin {
    fn set_high(&mut self) -> Result<(), Self::Error> {
        Err(ErrorKind::Other)
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        Err(ErrorKind::Other)
    }
}

#[test]
fn test_pin_error_is_reported_and_step_not_counted() {
    let ticks = Cell::new(0);
    let dir = PinMock::new(&[PinTransaction::set(PinState::High)]);
    let mut motor = StepperMotor::builder()
        .step_pin(FailingPin)
        .dir_pin(dir)
        .delay(NoopDelay::new())
        .clock(|| ticks.get())
        .max_velocity(500.0)
        .acceleration(1000.0)
        .build()
        .unwrap();

    motor.move_by(5);
    assert!(matches!(
        motor.run_once(),
        Err(Error::Motor(MotorError::PinError))
    ));
    assert_eq!(motor.current_position_steps(), 0);
    assert_eq!(motor.distance_to_go(), 5);

    let (_, mut dir, _, _) = motor.release();
    dir.done();
}

/// STEP pin whose falling edge fails a set number of times.
struct FlakyStepPin {
    low_failures: u32,
    levels: Vec<bool>,
}

impl FlakyStepPin {
    fn new(low_failures: u32) -> Self {
        Self {
            low_failures,
            levels: Vec::new(),
        }
    }
}

impl ErrorType for FlakyStepPin {
    type Error = ErrorKind;
}

impl OutputPin for FlakyStepPin {
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.levels.push(true);
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        if self.low_failures > 0 {
            self.low_failures -= 1;
            return Err(ErrorKind::Other);
        }
        self.levels.push(false);
        Ok(())
    }
}

fn flaky_motor<'a>(
    low_failures: u32,
    dir: PinMock,
    ticks: &'a Cell<u64>,
) -> StepperMotor<FlakyStepPin, PinMock, NoopDelay, impl Fn() -> u64 + 'a> {
    StepperMotor::builder()
        .step_pin(FlakyStepPin::new(low_failures))
        .dir_pin(dir)
        .delay(NoopDelay::new())
        .clock(move || ticks.get())
        .max_velocity(500.0)
        .acceleration(1000.0)
        .build()
        .unwrap()
}

#[test]
fn test_falling_edge_retried_once() {
    let ticks = Cell::new(0);
    let dir = PinMock::new(&[PinTransaction::set(PinState::High)]);
    let mut motor = flaky_motor(1, dir, &ticks);

    motor.move_by(5);
    assert!(motor.run_once().unwrap());
    assert_eq!(motor.current_position_steps(), 1);

    let (step, mut dir, _, _) = motor.release();
    assert_eq!(step.levels, [true, false]);
    dir.done();
}

#[test]
fn test_failed_falling_edge_still_counts_step() {
    let ticks = Cell::new(0);
    let dir = PinMock::new(&[PinTransaction::set(PinState::High)]);
    let mut motor = flaky_motor(2, dir, &ticks);

    motor.move_by(5);
    assert!(matches!(
        motor.run_once(),
        Err(Error::Motor(MotorError::PinError))
    ));
    // the rising edge went out, so the driver moved
    assert_eq!(motor.current_position_steps(), 1);
    assert_eq!(motor.distance_to_go(), 4);

    let (step, mut dir, _, _) = motor.release();
    assert_eq!(step.levels, [true]);
    dir.done();
}
