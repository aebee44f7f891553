//! Configuration module for stepper-ramp.
//!
//! Provides types for loading and validating axis and move configurations
//! from TOML files (with `std` feature) or pre-parsed data.

mod axis;
mod moves;
mod system;
pub mod units;
#[cfg(feature = "std")]
mod loader;
mod validation;

pub use axis::{AxisConfig, DEFAULT_MIN_PULSE_WIDTH_US};
pub use moves::MoveConfig;
pub use system::SystemConfig;
pub use validation::validate_config;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{Microsteps, Steps, StepsPerSec, StepsPerSecSquared};
