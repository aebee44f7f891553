//! Named relative moves from TOML.

use heapless::String;
use serde::Deserialize;

use crate::motion::MotionLimits;

use super::units::Steps;

/// A named relative move from configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MoveConfig {
    /// Axis the move runs on (must match a key under `[axes]`).
    pub axis: String<32>,

    /// Signed distance in steps, relative to wherever the axis is when executed.
    #[serde(rename = "distance_steps")]
    pub distance: Steps,

    /// Velocity as percentage of the axis maximum (1-200).
    #[serde(default = "default_percent")]
    pub velocity_percent: u8,

    /// Acceleration as percentage of the axis acceleration (1-200).
    #[serde(default = "default_percent")]
    pub acceleration_percent: u8,
}

fn default_percent() -> u8 {
    100
}

impl MoveConfig {
    /// Limits to run this move with, derived from the axis limits.
    pub fn scaled_limits(&self, axis: &MotionLimits) -> MotionLimits {
        axis.scaled(self.velocity_percent, self.acceleration_percent)
    }

    /// Whether the move runs at the axis' own limits.
    pub fn is_unscaled(&self) -> bool {
        self.velocity_percent == 100 && self.acceleration_percent == 100
    }
}
