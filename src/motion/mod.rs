//! Motion module for stepper-ramp.
//!
//! Provides the per-step profile generator and the kinematic state it drives.

mod kinematics;
mod profile;

pub use kinematics::{KinematicState, MotionRequest};
pub use profile::{
    interval_ns, peak_velocity, plan_next_step, step_interval_ns, stopping_distance, Direction,
    MotionLimits, Segment, StepPlan, MIN_ACCELERATION, MIN_MAX_VELOCITY, MIN_VELOCITY,
};
