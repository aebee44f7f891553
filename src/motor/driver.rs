//! Stepper motor driver.
//!
//! Generic over embedded-hal 1.0 pin types, a delay provider for the pulse width, and a
//! [`Clock`] for step timing.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::units::Steps;
use crate::config::SystemConfig;
use crate::error::{ConfigError, Error, MotorError, Result};
use crate::motion::{Direction, KinematicState, MotionLimits, MotionRequest, Segment};

use super::builder::StepperMotorBuilder;
use super::clock::Clock;

/// Stepper motor driver for one axis.
///
/// Generic over:
/// - `STEP`: STEP pin type (must implement `OutputPin`)
/// - `DIR`: DIR pin type (must implement `OutputPin`)
/// - `DELAY`: Delay provider (must implement `DelayNs`), used only for the pulse width
/// - `CLK`: Monotonic time source (must implement [`Clock`])
///
/// [`run_once`](Self::run_once) never waits for a step to become due, so it can share a
/// main loop with other work. [`run_to_completion`](Self::run_to_completion) spins on it.
pub struct StepperMotor<STEP, DIR, DELAY, CLK>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
    CLK: Clock,
{
    /// STEP pin (pulse to move one step).
    step_pin: STEP,

    /// DIR pin (high = clockwise, or inverted).
    dir_pin: DIR,

    /// Delay provider for the STEP pulse width.
    delay: DELAY,

    /// Time source for step scheduling.
    clock: CLK,

    /// Position, velocity and move lifecycle.
    state: KinematicState,

    /// Direction last written to the DIR pin.
    current_direction: Option<Direction>,

    /// Motor name for logging/debugging.
    name: heapless::String<32>,

    /// Whether direction pin logic is inverted.
    invert_direction: bool,

    /// STEP pulse high time in microseconds.
    min_pulse_width_us: u32,

    /// Microsteps per output revolution, if known.
    steps_per_revolution: Option<u32>,
}

impl<STEP, DIR, DELAY, CLK> StepperMotor<STEP, DIR, DELAY, CLK>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
    CLK: Clock,
{
    /// Start building a motor.
    pub fn builder() -> StepperMotorBuilder<STEP, DIR, DELAY, CLK> {
        StepperMotorBuilder::new()
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        step_pin: STEP,
        dir_pin: DIR,
        delay: DELAY,
        clock: CLK,
        limits: MotionLimits,
        name: heapless::String<32>,
        invert_direction: bool,
        min_pulse_width_us: u32,
        steps_per_revolution: Option<u32>,
    ) -> Self {
        Self {
            step_pin,
            dir_pin,
            delay,
            clock,
            state: KinematicState::new(limits),
            current_direction: None,
            name,
            invert_direction,
            min_pulse_width_us,
            steps_per_revolution,
        }
    }

    /// Get the motor name.
    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Kinematic state of the axis.
    #[inline]
    pub fn state(&self) -> &KinematicState {
        &self.state
    }

    /// Mutable access to the kinematic state.
    ///
    /// Moves and limits changed through here are picked up by the next [`Self::run_once`].
    #[inline]
    pub fn state_mut(&mut self) -> &mut KinematicState {
        &mut self.state
    }

    /// Set maximum velocity (steps/sec) and acceleration (steps/sec²).
    ///
    /// Non-positive values are clamped to a small positive floor.
    pub fn configure(&mut self, max_velocity: f32, acceleration: f32) {
        self.state.configure(max_velocity, acceleration);
    }

    /// Set the maximum velocity in steps/sec.
    pub fn set_max_velocity(&mut self, max_velocity: f32) {
        self.state.set_max_velocity(max_velocity);
    }

    /// Set the acceleration in steps/sec².
    pub fn set_acceleration(&mut self, acceleration: f32) {
        self.state.set_acceleration(acceleration);
    }

    /// Configured maximum velocity in steps/sec.
    #[inline]
    pub fn max_velocity(&self) -> f32 {
        self.state.limits().max_velocity()
    }

    /// Configured acceleration in steps/sec².
    #[inline]
    pub fn acceleration(&self) -> f32 {
        self.state.limits().acceleration()
    }

    /// Apply a move request (limits and distance).
    pub fn apply(&mut self, request: MotionRequest) {
        self.state.apply(request);
    }

    /// Move by a signed number of steps relative to the current position.
    ///
    /// See [`KinematicState::move_by`] for how this interacts with a move in flight.
    pub fn move_by(&mut self, steps: i64) {
        self.state.move_by(steps);
    }

    /// Move to an absolute position in steps.
    pub fn move_to(&mut self, target: i64) {
        self.state.move_to(target);
    }

    /// Ramp down to a stop using the configured acceleration.
    pub fn stop(&mut self) {
        self.state.stop();
    }

    /// Redefine the current position, abandoning any move.
    pub fn set_current_position(&mut self, position: i64) {
        self.state.set_current_position(position);
    }

    /// Steps left in the current move.
    #[inline]
    pub fn distance_to_go(&self) -> u64 {
        self.state.distance_to_go()
    }

    /// Current position in steps.
    #[inline]
    pub fn current_position_steps(&self) -> i64 {
        self.state.current_position()
    }

    /// Current position in output revolutions, if steps per revolution is configured.
    pub fn current_position_revolutions(&self) -> Option<f32> {
        self.steps_per_revolution
            .map(|spr| Steps(self.state.current_position()).to_revolutions(spr))
    }

    /// Position the axis is heading for.
    #[inline]
    pub fn target_position(&self) -> i64 {
        self.state.target_position()
    }

    /// Signed velocity in steps/sec.
    #[inline]
    pub fn velocity(&self) -> f32 {
        self.state.velocity()
    }

    /// Current ramp segment.
    #[inline]
    pub fn segment(&self) -> Segment {
        self.state.segment()
    }

    /// Whether a move is in progress.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Emit the next step if it is due.
    ///
    /// Returns `Ok(true)` if a step was emitted. Never waits: a step that is not due yet
    /// leaves everything untouched and returns `Ok(false)`, as does an idle axis.
    pub fn run_once(&mut self) -> Result<bool> {
        if !self.state.is_running() {
            return Ok(false);
        }

        let now = self.clock.now_ns();
        if !self.state.is_step_due(now) {
            return Ok(false);
        }

        self.set_direction(self.state.direction())?;
        self.step_pin.set_high().map_err(|_| MotorError::PinError)?;
        self.delay.delay_us(self.min_pulse_width_us);
        // The driver steps on the rising edge: count it even if the falling edge fails.
        self.state.commit_step(now);
        self.end_pulse()?;

        #[cfg(feature = "defmt")]
        if !self.state.is_running() {
            defmt::debug!("{}: move complete at {}", self.name.as_str(), self.state.current_position());
        }

        Ok(true)
    }

    /// Run the current move to completion, spinning on [`Self::run_once`].
    ///
    /// Busy-waits without sleeping to keep step timing tight.
    pub fn run_to_completion(&mut self) -> Result<()> {
        while self.state.distance_to_go() != 0 {
            self.run_once()?;
        }
        Ok(())
    }

    /// Move by `steps` and block until done.
    pub fn move_by_blocking(&mut self, steps: i64) -> Result<()> {
        self.move_by(steps);
        self.run_to_completion()
    }

    /// Execute a named move from configuration, blocking until done.
    ///
    /// The move runs with the axis limits scaled by its percentages; the previous limits
    /// are restored afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The move is not found in the configuration
    /// - The move is for a different axis than this motor
    /// - A pin operation fails
    pub fn execute(&mut self, move_name: &str, config: &SystemConfig) -> Result<()> {
        let mv = config.move_config(move_name).ok_or_else(|| {
            Error::Config(ConfigError::MoveNotFound(
                heapless::String::try_from(move_name).unwrap_or_default(),
            ))
        })?;

        if mv.axis.as_str() != self.name.as_str() {
            return Err(Error::Config(ConfigError::UnknownAxisReference {
                name: heapless::String::try_from(move_name).unwrap_or_default(),
                axis: mv.axis.clone(),
            }));
        }

        let saved = *self.state.limits();
        self.state.set_limits(mv.scaled_limits(&saved));
        self.state.move_by(mv.distance.value());
        let result = self.run_to_completion();
        self.state.set_limits(saved);
        result
    }

    /// Release the hardware.
    pub fn release(self) -> (STEP, DIR, DELAY, CLK) {
        (self.step_pin, self.dir_pin, self.delay, self.clock)
    }

    /// Drive STEP low, retrying once so the pin is not left high.
    fn end_pulse(&mut self) -> Result<()> {
        if self.step_pin.set_low().is_ok() {
            return Ok(());
        }
        self.step_pin.set_low().map_err(|_| MotorError::PinError)?;
        Ok(())
    }

    fn set_direction(&mut self, direction: Direction) -> Result<()> {
        if self.current_direction == Some(direction) {
            return Ok(());
        }

        let pin_high = match direction {
            Direction::Clockwise => !self.invert_direction,
            Direction::CounterClockwise => self.invert_direction,
        };

        if pin_high {
            self.dir_pin.set_high().map_err(|_| MotorError::PinError)?;
        } else {
            self.dir_pin.set_low().map_err(|_| MotorError::PinError)?;
        }

        self.current_direction = Some(direction);
        Ok(())
    }
}
