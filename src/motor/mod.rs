//! Motor module for stepper-ramp.
//!
//! Provides the step scheduler that turns the kinematic state into STEP/DIR pulses.

mod builder;
mod clock;
mod driver;

pub use builder::StepperMotorBuilder;
#[cfg(feature = "std")]
pub use clock::StdClock;
pub use clock::Clock;
pub use driver::StepperMotor;
