//! Axis configuration from TOML.

use serde::Deserialize;

use crate::motion::MotionLimits;

use super::units::{Microsteps, StepsPerSec, StepsPerSecSquared};

/// Configuration of one stepper axis.
///
/// Velocity and acceleration are not validated here: non-positive values are clamped to
/// a small positive floor when the limits are applied.
#[derive(Debug, Clone, Deserialize)]
pub struct AxisConfig {
    /// Maximum velocity in steps per second.
    #[serde(rename = "max_velocity_steps_per_sec")]
    pub max_velocity: StepsPerSec,

    /// Acceleration (and deceleration) in steps per second squared.
    #[serde(rename = "acceleration_steps_per_sec2")]
    pub acceleration: StepsPerSecSquared,

    /// Minimum STEP pulse high time in microseconds.
    #[serde(default = "default_min_pulse_width_us")]
    pub min_pulse_width_us: u32,

    /// Invert direction pin logic.
    #[serde(default)]
    pub invert_direction: bool,

    /// Base steps per revolution (typically 200 for 1.8° motors), if known.
    #[serde(default)]
    pub steps_per_revolution: Option<u16>,

    /// Microstep setting the driver is wired for.
    #[serde(default)]
    pub microsteps: Microsteps,
}

/// Default STEP pulse width, enough for common drivers (A4988 needs 1µs, DRV8825 1.9µs).
pub const DEFAULT_MIN_PULSE_WIDTH_US: u32 = 2;

fn default_min_pulse_width_us() -> u32 {
    DEFAULT_MIN_PULSE_WIDTH_US
}

impl AxisConfig {
    /// Create an axis configuration with default pulse width and no revolution data.
    pub fn new(max_velocity: StepsPerSec, acceleration: StepsPerSecSquared) -> Self {
        Self {
            max_velocity,
            acceleration,
            min_pulse_width_us: DEFAULT_MIN_PULSE_WIDTH_US,
            invert_direction: false,
            steps_per_revolution: None,
            microsteps: Microsteps::FULL,
        }
    }

    /// Motion limits for this axis (clamped).
    pub fn limits(&self) -> MotionLimits {
        MotionLimits::new(self.max_velocity.value(), self.acceleration.value())
    }

    /// Total microsteps per output revolution, if the base step count is configured.
    pub fn total_steps_per_revolution(&self) -> Option<u32> {
        self.microsteps
            .total_steps_per_revolution(self.steps_per_revolution)
    }
}
