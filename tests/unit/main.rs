//! Unit test harness for stepper-ramp.
//!
//! Exercises each component through the public API.

mod kinematic_properties;
mod pin_transactions;
