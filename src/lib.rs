//! # stepper-ramp
//!
//! Open-loop stepper motor ramp controller with embedded-hal 1.0 support.
//!
//! Turns a relative move, a maximum velocity and an acceleration into timed STEP
//! pulses: accelerate, cruise, decelerate to a full stop, tracking absolute position
//! along the way. Short moves that cannot reach the maximum velocity fall back to a
//! triangular profile automatically.
//!
//! ## Features
//!
//! - **Per-step kinematics**: `v' = sqrt(v² ± 2a)` evaluated for every step
//! - **Cooperative or blocking**: non-blocking `run_once` for a shared main loop,
//!   `run_to_completion` for a synchronous call
//! - **Live reconfiguration**: limits and targets may change mid-move without velocity jumps
//! - **embedded-hal 1.0**: `OutputPin` for STEP/DIR, `DelayNs` for the pulse width
//! - **no_std compatible**: Core library works without standard library
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stepper_ramp::{StdClock, StepperMotor};
//!
//! let mut motor = StepperMotor::builder()
//!     .step_pin(step_pin)
//!     .dir_pin(dir_pin)
//!     .delay(delay)
//!     .clock(StdClock::new())
//!     .max_velocity(4000.0)
//!     .acceleration(8000.0)
//!     .build()?;
//!
//! motor.move_by(-1600);
//! while motor.is_running() {
//!     motor.run_once()?;
//!     // other periodic work
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O, TOML parsing and [`StdClock`]
//! - `alloc`: Enables heap allocation for no_std with allocator
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

#[cfg(feature = "alloc")]
extern crate alloc;

// Core modules
pub mod config;
pub mod error;
pub mod motion;
pub mod motor;

// Re-exports for ergonomic API
pub use config::{validate_config, AxisConfig, MoveConfig, SystemConfig};
pub use error::{Error, Result};
pub use motion::{Direction, KinematicState, MotionLimits, MotionRequest, Segment};
pub use motor::{Clock, StepperMotor, StepperMotorBuilder};

#[cfg(feature = "std")]
pub use motor::StdClock;

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};

// Unit types
pub use config::units::{Microsteps, Steps, StepsPerSec, StepsPerSecSquared};
