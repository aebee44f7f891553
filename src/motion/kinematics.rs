//! Kinematic state of a single axis.
//!
//! Holds position, velocity and the in-flight move. The state knows nothing about pins
//! or clocks: the step scheduler asks [`KinematicState::is_step_due`], emits the pulse,
//! then calls [`KinematicState::commit_step`] to advance. Keeping the hardware out makes
//! every ramp decision testable on its own.

use libm::{ceilf, sqrtf};

use super::profile::{
    plan_next_step, step_interval_ns, stopping_distance, Direction, MotionLimits, Segment, StepPlan,
};

/// A relative move request: distance plus the limits to move it with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionRequest {
    /// Signed distance in steps (sign encodes direction).
    pub distance_steps: i64,
    /// Maximum velocity in steps/sec.
    pub max_velocity: f32,
    /// Acceleration in steps/sec².
    pub acceleration: f32,
}

impl MotionRequest {
    /// Create a new request.
    pub fn new(distance_steps: i64, max_velocity: f32, acceleration: f32) -> Self {
        Self {
            distance_steps,
            max_velocity,
            acceleration,
        }
    }
}

/// Position, velocity and move lifecycle for one axis.
///
/// Invariants kept by every method:
/// - `steps_remaining == 0` exactly when `segment == Segment::Idle`
/// - velocity is zero whenever the axis is idle
/// - velocity never changes by more than one step's worth of acceleration per step
#[derive(Debug, Clone)]
pub struct KinematicState {
    /// Absolute position in steps.
    position: i64,
    /// Velocity magnitude in steps/sec at the most recently planned step.
    velocity: f32,
    /// Steps left in the current move.
    steps_remaining: u64,
    /// Direction of the current move.
    direction: Direction,
    /// Current ramp segment.
    segment: Segment,
    /// Timestamp (ns) at or after which the next step may fire.
    next_step_due_ns: u64,
    /// Configured limits.
    limits: MotionLimits,
    /// Absolute target to head for once a direction reversal has ramped down to zero.
    pending_target: Option<i64>,
}

impl Default for KinematicState {
    fn default() -> Self {
        Self::new(MotionLimits::default())
    }
}

impl KinematicState {
    /// Create an idle state at position zero.
    pub fn new(limits: MotionLimits) -> Self {
        Self {
            position: 0,
            velocity: 0.0,
            steps_remaining: 0,
            direction: Direction::Clockwise,
            segment: Segment::Idle,
            next_step_due_ns: 0,
            limits,
            pending_target: None,
        }
    }

    /// Set both limits at once.
    pub fn configure(&mut self, max_velocity: f32, acceleration: f32) {
        self.set_max_velocity(max_velocity);
        self.set_acceleration(acceleration);
    }

    /// Set the maximum velocity (steps/sec). Non-positive values are clamped.
    ///
    /// Takes effect on the next planned step.
    pub fn set_max_velocity(&mut self, max_velocity: f32) {
        if self.limits.set_max_velocity(max_velocity) {
            #[cfg(feature = "defmt")]
            defmt::trace!("max velocity {} clamped to {}", max_velocity, self.limits.max_velocity());
        }
    }

    /// Set the acceleration (steps/sec²). Non-positive values are clamped.
    ///
    /// Takes effect on the next planned step: the stopping distance is recomputed from
    /// the velocity already attained.
    pub fn set_acceleration(&mut self, acceleration: f32) {
        if self.limits.set_acceleration(acceleration) {
            #[cfg(feature = "defmt")]
            defmt::trace!("acceleration {} clamped to {}", acceleration, self.limits.acceleration());
        }
    }

    /// Replace the limits wholesale.
    pub fn set_limits(&mut self, limits: MotionLimits) {
        self.limits = limits;
    }

    /// Apply a full request: limits first, then the relative move.
    pub fn apply(&mut self, request: MotionRequest) {
        self.configure(request.max_velocity, request.acceleration);
        self.move_by(request.distance_steps);
    }

    /// Start (or redefine) a move relative to the current position.
    ///
    /// - `0` cancels the move outright; the axis stops without a ramp.
    /// - From rest, the first step is due immediately.
    /// - While moving in the same direction, the remaining distance is redefined from the
    ///   current position and the ramp continues from the current velocity.
    /// - While moving in the opposite direction, or in the same direction but closer than
    ///   the stopping distance, the axis first ramps down to zero in its current direction,
    ///   then heads for `position + steps`.
    ///
    /// A target past either end of the `i64` range saturates there.
    pub fn move_by(&mut self, steps: i64) {
        if steps == 0 {
            self.halt();
            return;
        }
        self.move_to(self.position.saturating_add(steps));
    }

    /// Move to an absolute position, with the same rules as [`Self::move_by`].
    pub fn move_to(&mut self, target: i64) {
        if target == self.position {
            self.halt();
            return;
        }

        let direction = Direction::toward(self.position, target);
        let distance = target.abs_diff(self.position);

        if self.is_running() && self.velocity > 0.0 {
            if direction != self.direction || distance < self.stop_steps() {
                #[cfg(feature = "defmt")]
                defmt::debug!("cannot stop in time, ramping down before heading to {}", target);
                self.ramp_down();
                self.pending_target = Some(target);
            } else {
                self.steps_remaining = distance;
                self.pending_target = None;
                if self.segment == Segment::Decelerating {
                    self.segment = Segment::Cruising;
                }
            }
            return;
        }

        self.start_from_rest(target, 0);
    }

    /// Ramp down to a stop as quickly as the acceleration allows.
    ///
    /// Never extends the current move. A move whose first step has not fired yet is
    /// simply cancelled.
    pub fn stop(&mut self) {
        if !self.is_running() {
            return;
        }
        if self.velocity <= 0.0 {
            self.halt();
            return;
        }
        #[cfg(feature = "defmt")]
        defmt::debug!("stop requested at position {}", self.position);
        self.ramp_down();
        self.pending_target = None;
    }

    /// Redefine the current position. Any move in progress is abandoned.
    pub fn set_current_position(&mut self, position: i64) {
        self.halt();
        self.position = position;
    }

    /// Whether a step is due at `now_ns`. Always `false` when idle.
    #[inline]
    pub fn is_step_due(&self, now_ns: u64) -> bool {
        self.steps_remaining > 0 && now_ns >= self.next_step_due_ns
    }

    /// Account for a step that was just emitted at `now_ns` and plan the next one.
    ///
    /// Callers must only invoke this after [`Self::is_step_due`] returned `true`.
    pub fn commit_step(&mut self, now_ns: u64) -> StepPlan {
        self.position = self.position.saturating_add(self.direction.sign());
        self.steps_remaining = self.steps_remaining.saturating_sub(1);

        let plan = plan_next_step(self.velocity, self.steps_remaining, self.segment, &self.limits);
        self.segment = plan.segment;
        self.velocity = plan.velocity;
        self.next_step_due_ns = now_ns.saturating_add(plan.interval_ns);

        if plan.segment == Segment::Idle {
            if let Some(target) = self.pending_target.take() {
                if target != self.position {
                    // Leave the one-step-from-rest time before the first reversed step.
                    let a = self.limits.acceleration();
                    let first = sqrtf(2.0 * a).min(self.limits.max_velocity());
                    let first_interval = step_interval_ns(0.0, first, a);
                    self.start_from_rest(target, now_ns.saturating_add(first_interval));
                }
            }
        }

        plan
    }

    /// Current absolute position in steps.
    #[inline]
    pub fn current_position(&self) -> i64 {
        self.position
    }

    /// Steps left in the current move (direction given by [`Self::direction`]).
    #[inline]
    pub fn distance_to_go(&self) -> u64 {
        self.steps_remaining
    }

    /// Position the axis is heading for, including a pending reversal.
    pub fn target_position(&self) -> i64 {
        match self.pending_target {
            Some(target) => target,
            None => match self.direction {
                Direction::Clockwise => self.position.saturating_add_unsigned(self.steps_remaining),
                Direction::CounterClockwise => {
                    self.position.saturating_sub_unsigned(self.steps_remaining)
                }
            },
        }
    }

    /// Signed velocity in steps/sec.
    #[inline]
    pub fn velocity(&self) -> f32 {
        self.velocity * self.direction.sign() as f32
    }

    /// Velocity magnitude in steps/sec.
    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity
    }

    /// Direction of the current (or last) move.
    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Current ramp segment.
    #[inline]
    pub fn segment(&self) -> Segment {
        self.segment
    }

    /// Timestamp (ns) at which the next step becomes due.
    #[inline]
    pub fn next_step_due_ns(&self) -> u64 {
        self.next_step_due_ns
    }

    /// Configured limits.
    #[inline]
    pub fn limits(&self) -> &MotionLimits {
        &self.limits
    }

    /// Whether a move is in progress.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.steps_remaining > 0
    }

    fn start_from_rest(&mut self, target: i64, due_ns: u64) {
        self.direction = Direction::toward(self.position, target);
        self.steps_remaining = target.abs_diff(self.position);
        self.segment = Segment::Accelerating;
        self.velocity = 0.0;
        self.next_step_due_ns = due_ns;
        self.pending_target = None;
        #[cfg(feature = "defmt")]
        defmt::debug!("move from {} to {}", self.position, target);
    }

    /// Whole steps needed to stop from the current velocity.
    fn stop_steps(&self) -> u64 {
        ceilf(stopping_distance(self.velocity, self.limits.acceleration())) as u64
    }

    /// Shrink the move to the stopping distance at the current velocity.
    fn ramp_down(&mut self) {
        self.steps_remaining = self.steps_remaining.min(self.stop_steps().max(1));
        self.segment = Segment::Decelerating;
    }

    fn halt(&mut self) {
        self.steps_remaining = 0;
        self.velocity = 0.0;
        self.segment = Segment::Idle;
        self.pending_target = None;
    }
}
