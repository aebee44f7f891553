//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::{MoveConfig, SystemConfig};

/// Validate a system configuration.
///
/// Checks:
/// - Every move references an existing axis
/// - Velocity/acceleration percentages are in range
///
/// Axis velocity and acceleration are deliberately not checked; they are clamped
/// to a positive floor when applied.
pub fn validate_config(config: &SystemConfig) -> Result<()> {
    for (name, mv) in config.moves.iter() {
        validate_move(name.as_str(), mv, config)?;
    }

    Ok(())
}

fn validate_move(name: &str, mv: &MoveConfig, config: &SystemConfig) -> Result<()> {
    if config.axis(mv.axis.as_str()).is_none() {
        return Err(Error::Config(ConfigError::UnknownAxisReference {
            name: heapless::String::try_from(name).unwrap_or_default(),
            axis: mv.axis.clone(),
        }));
    }

    if mv.velocity_percent == 0 || mv.velocity_percent > 200 {
        return Err(Error::Config(ConfigError::InvalidVelocityPercent(
            mv.velocity_percent,
        )));
    }

    if mv.acceleration_percent == 0 || mv.acceleration_percent > 200 {
        return Err(Error::Config(ConfigError::InvalidAccelerationPercent(
            mv.acceleration_percent,
        )));
    }

    Ok(())
}
