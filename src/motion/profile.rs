//! Per-step motion profile generation.
//!
//! Instead of precomputing phase lengths for a whole move, the generator looks at the
//! kinematic state after every emitted step and decides the segment and velocity for
//! the next one. A full trapezoid (accelerate, cruise, decelerate) falls out when the
//! remaining distance allows reaching `max_velocity`; otherwise the peak is capped and
//! the move degrades to a triangle.

use libm::sqrtf;

/// Smallest velocity (steps/sec) used when converting a velocity into a step interval.
pub const MIN_VELOCITY: f32 = 1.0e-3;

/// Floor applied to configured maximum velocity (steps/sec).
pub const MIN_MAX_VELOCITY: f32 = 1.0;

/// Floor applied to configured acceleration (steps/sec²).
pub const MIN_ACCELERATION: f32 = 1.0;

const NANOS_PER_SEC: f32 = 1_000_000_000.0;

/// Slack (in steps) on the forced-deceleration test. A stop whose distance lands on a whole
/// step count must not be missed because of f32 rounding in `v²`.
const STOP_TOLERANCE: f32 = 1.0e-2;

/// Ramps within this fraction of a full step are timed as a full-step ramp.
const RAMP_EPSILON: f32 = 1.0e-3;

/// Direction of motor motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Clockwise (positive step count).
    Clockwise,
    /// Counter-clockwise (negative step count).
    CounterClockwise,
}

impl Direction {
    /// Direction that leads from `from` to `to`. Clockwise when they are equal.
    #[inline]
    pub fn toward(from: i64, to: i64) -> Self {
        if to >= from {
            Direction::Clockwise
        } else {
            Direction::CounterClockwise
        }
    }

    /// Get the sign multiplier.
    #[inline]
    pub fn sign(self) -> i64 {
        match self {
            Direction::Clockwise => 1,
            Direction::CounterClockwise => -1,
        }
    }
}

/// Current segment of a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Segment {
    /// No move in progress.
    #[default]
    Idle,
    /// Velocity rising toward the (possibly capped) peak.
    Accelerating,
    /// Constant velocity at `max_velocity`.
    Cruising,
    /// Velocity falling, either to stop at the target or to honor a lowered limit.
    Decelerating,
}

/// Velocity and acceleration limits for one axis.
///
/// Non-positive (or NaN) values are clamped to [`MIN_MAX_VELOCITY`] and
/// [`MIN_ACCELERATION`] rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionLimits {
    max_velocity: f32,
    acceleration: f32,
}

impl MotionLimits {
    /// Create limits, clamping both values to their positive floors.
    pub fn new(max_velocity: f32, acceleration: f32) -> Self {
        Self {
            max_velocity: clamp_positive(max_velocity, MIN_MAX_VELOCITY),
            acceleration: clamp_positive(acceleration, MIN_ACCELERATION),
        }
    }

    /// Maximum velocity in steps/sec.
    #[inline]
    pub fn max_velocity(&self) -> f32 {
        self.max_velocity
    }

    /// Acceleration (and deceleration) in steps/sec².
    #[inline]
    pub fn acceleration(&self) -> f32 {
        self.acceleration
    }

    /// Set the maximum velocity. Returns `true` if the value had to be clamped.
    pub fn set_max_velocity(&mut self, max_velocity: f32) -> bool {
        self.max_velocity = clamp_positive(max_velocity, MIN_MAX_VELOCITY);
        self.max_velocity != max_velocity
    }

    /// Set the acceleration. Returns `true` if the value had to be clamped.
    pub fn set_acceleration(&mut self, acceleration: f32) -> bool {
        self.acceleration = clamp_positive(acceleration, MIN_ACCELERATION);
        self.acceleration != acceleration
    }

    /// Return a copy with both limits scaled by percentages (1-200).
    pub fn scaled(&self, velocity_percent: u8, acceleration_percent: u8) -> Self {
        Self::new(
            self.max_velocity * velocity_percent as f32 / 100.0,
            self.acceleration * acceleration_percent as f32 / 100.0,
        )
    }
}

impl Default for MotionLimits {
    fn default() -> Self {
        Self::new(MIN_MAX_VELOCITY, MIN_ACCELERATION)
    }
}

fn clamp_positive(value: f32, floor: f32) -> f32 {
    // `!(x >= floor)` also catches NaN
    if !(value >= floor) {
        floor
    } else {
        value
    }
}

/// Decision for the step that follows the one just emitted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepPlan {
    /// Segment the next step belongs to.
    pub segment: Segment,
    /// Velocity magnitude (steps/sec) reached at the next step.
    pub velocity: f32,
    /// Time until the next step is due, in nanoseconds. Zero when idle.
    pub interval_ns: u64,
}

/// Distance in steps needed to stop from `velocity` at `acceleration`: `v² / 2a`.
#[inline]
pub fn stopping_distance(velocity: f32, acceleration: f32) -> f32 {
    velocity * velocity / (2.0 * acceleration)
}

/// Highest velocity still allowing a stop within `remaining` steps when starting from
/// `velocity`: accelerate for half the leftover distance, decelerate for the other half.
///
/// From rest this is `sqrt(a * d)`.
#[inline]
pub fn peak_velocity(velocity: f32, remaining: u64, acceleration: f32) -> f32 {
    sqrtf(acceleration * remaining as f32 + 0.5 * velocity * velocity)
}

/// Convert a velocity (steps/sec) into a step interval in nanoseconds.
#[inline]
pub fn interval_ns(velocity: f32) -> u64 {
    let velocity = if velocity > MIN_VELOCITY { velocity } else { MIN_VELOCITY };
    (NANOS_PER_SEC / velocity) as u64
}

/// Time (ns) to travel one step while the velocity changes from `from` to `to` at
/// `acceleration`.
///
/// When the ramp from `from` to `to` covers the whole step this is `1 / mean(from, to)`.
/// When `to` is a cap reached part-way through the step, the rest of the step is
/// travelled at `to`. Cruising gives exactly `1 / to`.
pub fn step_interval_ns(from: f32, to: f32, acceleration: f32) -> u64 {
    if from == to {
        return interval_ns(to);
    }
    let to = if to > MIN_VELOCITY { to } else { MIN_VELOCITY };
    let ramp = (to * to - from * from).abs() / (2.0 * acceleration);
    if ramp >= 1.0 - RAMP_EPSILON {
        return interval_ns(0.5 * (from + to));
    }
    let seconds = (to - from).abs() / acceleration + (1.0 - ramp) / to;
    (seconds * NANOS_PER_SEC) as u64
}

/// Plan the next step.
///
/// * `velocity` - velocity magnitude at the step just emitted
/// * `remaining` - steps still to go after that step
/// * `segment` - segment of the step just emitted
///
/// The interval is [`step_interval_ns`] from `velocity` to the new velocity.
pub fn plan_next_step(velocity: f32, remaining: u64, segment: Segment, limits: &MotionLimits) -> StepPlan {
    if remaining == 0 {
        return StepPlan {
            segment: Segment::Idle,
            velocity: 0.0,
            interval_ns: 0,
        };
    }

    let a = limits.acceleration();
    let v_max = limits.max_velocity();
    let d = remaining as f32;
    let v_sq = velocity * velocity;

    let (segment, next) = if d <= stopping_distance(velocity, a) + STOP_TOLERANCE {
        // Always leave room to stop exactly at the target.
        (Segment::Decelerating, decelerate(velocity, a, 0.0))
    } else if velocity > v_max {
        // Limit lowered mid-move: ramp down to it instead of jumping.
        (Segment::Decelerating, decelerate(velocity, a, v_max))
    } else if segment != Segment::Decelerating && velocity < v_max {
        let target = v_max.min(peak_velocity(velocity, remaining, a));
        (Segment::Accelerating, sqrtf(v_sq + 2.0 * a).min(target))
    } else {
        (Segment::Cruising, velocity)
    };

    StepPlan {
        segment,
        velocity: next,
        interval_ns: step_interval_ns(velocity, next, a),
    }
}

/// One step of deceleration from `velocity`, never below `floor`.
///
/// The final steps of a stop are held at the one-step velocity `sqrt(2a)` (the speed the
/// first step of a move is taken at) so the last interval mirrors the first.
fn decelerate(velocity: f32, acceleration: f32, floor: f32) -> f32 {
    let reduced = sqrtf((velocity * velocity - 2.0 * acceleration).max(0.0));
    let one_step = sqrtf(2.0 * acceleration).min(velocity);
    reduced.max(one_step).max(floor)
}
