//! Velocity matching with a neighbor list.

use steer_agent::CrowdAgent;
use steer_core::math::clamp_length_to;
use steer_core::{AgentId, Vec3};

use crate::{NeighborBehavior, NeighborTargets, ParamStore, SteeringBehavior, SteeringContext};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlignmentParams {
    pub targets: NeighborTargets,
    pub weight: f32,
}

impl Default for AlignmentParams {
    fn default() -> Self {
        Self { targets: NeighborTargets::new(), weight: 1.0 }
    }
}

/// Steers each agent toward the mean velocity of its neighbors.
#[derive(Debug)]
pub struct AlignmentBehavior {
    params: ParamStore<AlignmentParams>,
}

impl AlignmentBehavior {
    pub fn set_targets(&mut self, agent: AgentId, targets: &[AgentId]) {
        self.set_neighbors(agent, targets);
    }

    pub fn set_weight(&mut self, agent: AgentId, weight: f32) {
        self.params_mut(agent).weight = weight;
    }
}

impl SteeringBehavior for AlignmentBehavior {
    type Params = AlignmentParams;
    const NAME: &'static str = "alignment";

    fn from_store(params: ParamStore<AlignmentParams>) -> Self {
        Self { params }
    }

    fn store(&self) -> &ParamStore<AlignmentParams> {
        &self.params
    }

    fn store_mut(&mut self) -> &mut ParamStore<AlignmentParams> {
        &mut self.params
    }

    fn into_store(self) -> ParamStore<AlignmentParams> {
        self.params
    }

    fn compute_force(&self, ctx: &SteeringContext<'_>, agent: &CrowdAgent) -> Vec3 {
        let p = self.params(agent.id);
        let Some(neighbors) = ctx.resolve(&p.targets) else {
            return Vec3::ZERO;
        };

        let (sum, count) = neighbors
            .active_others(agent.id)
            .fold((Vec3::ZERO, 0u32), |(sum, n), other| (sum + other.vel, n + 1));
        if count == 0 {
            return Vec3::ZERO;
        }

        let steer = (sum / count as f32 - agent.vel) * p.weight;
        clamp_length_to(steer, agent.max_acceleration)
    }
}

impl NeighborBehavior for AlignmentBehavior {
    fn targets_mut(&mut self, agent: AgentId) -> &mut NeighborTargets {
        &mut self.params_mut(agent).targets
    }
}
