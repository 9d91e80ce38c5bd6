//! Pursuit of a (possibly moving) target agent, with arrival.

use steer_agent::CrowdAgent;
use steer_core::math::clamp_length_to;
use steer_core::{AgentId, Vec3};

use crate::{ParamStore, SteeringBehavior, SteeringContext, arrive};

/// Per-agent seek settings.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeekParams {
    /// Agent to pursue.  A weak reference: it may point at an inactive or
    /// removed slot, in which case the seeker is left alone.
    pub target: Option<AgentId>,

    /// Seconds of target velocity to lead by.  `0` aims at the current
    /// position.
    pub prediction_factor: f32,

    /// Stand-off distance from the target's footprint.  Negative values
    /// overshoot into it.
    pub distance: f32,
}

/// Steers each agent toward its target and brings it to rest at the
/// configured distance.
#[derive(Debug)]
pub struct SeekBehavior {
    params: ParamStore<SeekParams>,
}

impl SeekBehavior {
    pub fn set_target(&mut self, agent: AgentId, target: Option<AgentId>) {
        self.params_mut(agent).target = target;
    }

    pub fn set_prediction_factor(&mut self, agent: AgentId, factor: f32) {
        self.params_mut(agent).prediction_factor = factor;
    }

    pub fn set_distance(&mut self, agent: AgentId, distance: f32) {
        self.params_mut(agent).distance = distance;
    }

    fn target<'a>(&self, ctx: &SteeringContext<'a>, agent: AgentId) -> Option<&'a CrowdAgent> {
        self.params(agent).target.and_then(|t| ctx.active_agent(t))
    }
}

/// Lead-corrected direction to `target`, limited to the agent's acceleration.
fn seek_force(agent: &CrowdAgent, target: &CrowdAgent, prediction_factor: f32) -> Vec3 {
    let force = (target.pos - agent.pos) + target.vel * prediction_factor;
    clamp_length_to(force, agent.max_acceleration)
}

impl SteeringBehavior for SeekBehavior {
    type Params = SeekParams;
    const NAME: &'static str = "seek";

    fn from_store(params: ParamStore<SeekParams>) -> Self {
        Self { params }
    }

    fn store(&self) -> &ParamStore<SeekParams> {
        &self.params
    }

    fn store_mut(&mut self) -> &mut ParamStore<SeekParams> {
        &mut self.params
    }

    fn into_store(self) -> ParamStore<SeekParams> {
        self.params
    }

    /// Leaves `new` untouched when the target is unset or not active.
    fn update(&self, ctx: &SteeringContext<'_>, old: &CrowdAgent, new: &mut CrowdAgent, dt: f32) {
        debug_assert_eq!(old.id, new.id, "old and new records of different agents");
        let Some(target) = self.target(ctx, old.id) else {
            return;
        };
        let p = self.params(old.id);
        let force = seek_force(old, target, p.prediction_factor);
        arrive(old, target.pos, target.radius, p.distance, force, dt).write_to(new);
    }

    fn compute_force(&self, ctx: &SteeringContext<'_>, agent: &CrowdAgent) -> Vec3 {
        match self.target(ctx, agent.id) {
            Some(target) => seek_force(agent, target, self.params(agent.id).prediction_factor),
            None => Vec3::ZERO,
        }
    }

    fn apply_force(
        &self,
        ctx:   &SteeringContext<'_>,
        old:   &CrowdAgent,
        new:   &mut CrowdAgent,
        force: Vec3,
        dt:    f32,
    ) {
        if let Some(target) = self.target(ctx, old.id) {
            let distance = self.params(old.id).distance;
            arrive(old, target.pos, target.radius, distance, force, dt).write_to(new);
        }
    }
}
