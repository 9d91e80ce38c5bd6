//! Turning a steering force into a desired velocity.
//!
//! Two conversions exist, both free functions so any behavior can use them:
//!
//! - [`arrive`]: integrate, then brake linearly inside the stopping
//!   distance and stop dead at the goal.  Used by behaviors with a single
//!   destination (seek).
//! - [`integrate`]: integrate and clamp to the speed limit, nothing more.
//!   Used by behaviors with no destination (separation, alignment, cohesion).

use steer_agent::CrowdAgent;
use steer_core::math::clamp_length_to;
use steer_core::{EPSILON, Vec3};

/// The two fields a behavior contributes to an agent's next-tick record.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SteeringOutput {
    /// Desired velocity (written to `dvel`).
    pub velocity: Vec3,
    pub desired_speed: f32,
}

impl SteeringOutput {
    /// Zero velocity, zero desired speed.
    pub const STOP: Self = Self {
        velocity:      Vec3::ZERO,
        desired_speed: 0.0,
    };

    /// Write into the next-tick record.  Touches only `dvel` and `desired_speed`.
    #[inline]
    pub fn write_to(self, agent: &mut CrowdAgent) {
        agent.dvel = self.velocity;
        agent.desired_speed = self.desired_speed;
    }
}

/// Distance needed to stop from `speed` under constant deceleration
/// `max_acceleration` (`v² = u² − 2as` with final speed 0, without the ½).
///
/// `max_acceleration` must be strictly positive; zero gives `inf` (or NaN at
/// zero speed).
#[inline]
pub fn braking_distance(speed: f32, max_acceleration: f32) -> f32 {
    speed * speed / max_acceleration
}

/// Arrival kinematics toward a goal at `goal_pos` with footprint `goal_radius`.
///
/// `offset` is subtracted from the remaining distance; a negative offset
/// makes the agent overshoot.
pub fn arrive(
    old:         &CrowdAgent,
    goal_pos:    Vec3,
    goal_radius: f32,
    offset:      f32,
    force:       Vec3,
    dt:          f32,
) -> SteeringOutput {
    let mut velocity = old.vel + force * dt;

    let slow_dist = braking_distance(old.speed(), old.max_acceleration);
    let remaining = old.pos.distance(goal_pos) - old.radius - goal_radius - offset;

    let desired_speed = if remaining <= EPSILON {
        // Arrived: hard stop.
        velocity = Vec3::ZERO;
        0.0
    } else if remaining < slow_dist {
        velocity *= remaining / slow_dist;
        velocity.length()
    } else {
        old.max_speed
    };

    SteeringOutput {
        velocity: clamp_length_to(velocity, old.max_speed),
        desired_speed,
    }
}

/// Plain integration: `vel + force·dt`, clamped to the speed limit.
pub fn integrate(old: &CrowdAgent, force: Vec3, dt: f32) -> SteeringOutput {
    let velocity = clamp_length_to(old.vel + force * dt, old.max_speed);
    SteeringOutput {
        velocity,
        desired_speed: velocity.length(),
    }
}
