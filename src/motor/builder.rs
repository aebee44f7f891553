//! Builder pattern for StepperMotor.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::units::Microsteps;
use crate::config::{AxisConfig, SystemConfig, DEFAULT_MIN_PULSE_WIDTH_US};
use crate::error::{ConfigError, Error, MotorError, Result};
use crate::motion::MotionLimits;

use super::clock::Clock;
use super::driver::StepperMotor;

/// Builder for creating StepperMotor instances.
pub struct StepperMotorBuilder<STEP, DIR, DELAY, CLK>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
    CLK: Clock,
{
    step_pin: Option<STEP>,
    dir_pin: Option<DIR>,
    delay: Option<DELAY>,
    clock: Option<CLK>,
    name: Option<heapless::String<32>>,
    max_velocity: Option<f32>,
    acceleration: Option<f32>,
    invert_direction: bool,
    min_pulse_width_us: u32,
    steps_per_revolution: Option<u16>,
    microsteps: Microsteps,
}

impl<STEP, DIR, DELAY, CLK> Default for StepperMotorBuilder<STEP, DIR, DELAY, CLK>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
    CLK: Clock,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<STEP, DIR, DELAY, CLK> StepperMotorBuilder<STEP, DIR, DELAY, CLK>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
    CLK: Clock,
{
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            step_pin: None,
            dir_pin: None,
            delay: None,
            clock: None,
            name: None,
            max_velocity: None,
            acceleration: None,
            invert_direction: false,
            min_pulse_width_us: DEFAULT_MIN_PULSE_WIDTH_US,
            steps_per_revolution: None,
            microsteps: Microsteps::FULL,
        }
    }

    /// Set the STEP pin.
    pub fn step_pin(mut self, pin: STEP) -> Self {
        self.step_pin = Some(pin);
        self
    }

    /// Set the DIR pin.
    pub fn dir_pin(mut self, pin: DIR) -> Self {
        self.dir_pin = Some(pin);
        self
    }

    /// Set the delay provider used for the STEP pulse width.
    pub fn delay(mut self, delay: DELAY) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Set the monotonic clock used for step timing.
    pub fn clock(mut self, clock: CLK) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Set the motor name.
    pub fn name(mut self, name: &str) -> Self {
        self.name = heapless::String::try_from(name).ok();
        self
    }

    /// Set maximum velocity in steps per second.
    pub fn max_velocity(mut self, steps_per_sec: f32) -> Self {
        self.max_velocity = Some(steps_per_sec);
        self
    }

    /// Set acceleration in steps per second squared.
    pub fn acceleration(mut self, steps_per_sec2: f32) -> Self {
        self.acceleration = Some(steps_per_sec2);
        self
    }

    /// Set direction inversion.
    pub fn invert_direction(mut self, invert: bool) -> Self {
        self.invert_direction = invert;
        self
    }

    /// Set the STEP pulse high time in microseconds.
    pub fn min_pulse_width_us(mut self, us: u32) -> Self {
        self.min_pulse_width_us = us;
        self
    }

    /// Set steps per revolution (base motor steps before microstepping).
    pub fn steps_per_revolution(mut self, steps: u16) -> Self {
        self.steps_per_revolution = Some(steps);
        self
    }

    /// Set microstep configuration.
    pub fn microsteps(mut self, microsteps: Microsteps) -> Self {
        self.microsteps = microsteps;
        self
    }

    /// Configure from an AxisConfig.
    pub fn from_axis_config(mut self, config: &AxisConfig) -> Self {
        self.max_velocity = Some(config.max_velocity.value());
        self.acceleration = Some(config.acceleration.value());
        self.invert_direction = config.invert_direction;
        self.min_pulse_width_us = config.min_pulse_width_us;
        self.steps_per_revolution = config.steps_per_revolution;
        self.microsteps = config.microsteps;
        self
    }

    /// Configure from SystemConfig by axis name. The axis name becomes the motor name.
    pub fn from_config(self, config: &SystemConfig, axis_name: &str) -> Result<Self> {
        let axis_config = config.axis(axis_name).ok_or_else(|| {
            Error::Config(ConfigError::AxisNotFound(
                heapless::String::try_from(axis_name).unwrap_or_default(),
            ))
        })?;

        Ok(self.name(axis_name).from_axis_config(axis_config))
    }

    /// Build the StepperMotor.
    ///
    /// # Errors
    ///
    /// Returns `MotorError::MissingPart` if a pin, the delay, the clock, or a limit
    /// was never supplied.
    pub fn build(self) -> Result<StepperMotor<STEP, DIR, DELAY, CLK>> {
        let step_pin = self.step_pin.ok_or(MotorError::MissingPart("step_pin"))?;
        let dir_pin = self.dir_pin.ok_or(MotorError::MissingPart("dir_pin"))?;
        let delay = self.delay.ok_or(MotorError::MissingPart("delay"))?;
        let clock = self.clock.ok_or(MotorError::MissingPart("clock"))?;
        let max_velocity = self.max_velocity.ok_or(MotorError::MissingPart("max_velocity"))?;
        let acceleration = self.acceleration.ok_or(MotorError::MissingPart("acceleration"))?;

        let name = self
            .name
            .unwrap_or_else(|| heapless::String::try_from("motor").unwrap_or_default());

        let steps_per_revolution = self
            .microsteps
            .total_steps_per_revolution(self.steps_per_revolution);

        Ok(StepperMotor::new(
            step_pin,
            dir_pin,
            delay,
            clock,
            MotionLimits::new(max_velocity, acceleration),
            name,
            self.invert_direction,
            self.min_pulse_width_us,
            steps_per_revolution,
        ))
    }
}
