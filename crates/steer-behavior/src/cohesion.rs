//! Attraction toward the center of a neighbor list.

use steer_agent::CrowdAgent;
use steer_core::math::clamp_length_to;
use steer_core::{AgentId, Vec3};

use crate::{NeighborBehavior, NeighborTargets, ParamStore, SteeringBehavior, SteeringContext};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CohesionParams {
    pub targets: NeighborTargets,
    pub weight: f32,
}

impl Default for CohesionParams {
    fn default() -> Self {
        Self { targets: NeighborTargets::new(), weight: 1.0 }
    }
}

/// Steers each agent toward the mean position of its neighbors.
#[derive(Debug)]
pub struct CohesionBehavior {
    params: ParamStore<CohesionParams>,
}

impl CohesionBehavior {
    pub fn set_targets(&mut self, agent: AgentId, targets: &[AgentId]) {
        self.set_neighbors(agent, targets);
    }

    pub fn set_weight(&mut self, agent: AgentId, weight: f32) {
        self.params_mut(agent).weight = weight;
    }
}

impl SteeringBehavior for CohesionBehavior {
    type Params = CohesionParams;
    const NAME: &'static str = "cohesion";

    fn from_store(params: ParamStore<CohesionParams>) -> Self {
        Self { params }
    }

    fn store(&self) -> &ParamStore<CohesionParams> {
        &self.params
    }

    fn store_mut(&mut self) -> &mut ParamStore<CohesionParams> {
        &mut self.params
    }

    fn into_store(self) -> ParamStore<CohesionParams> {
        self.params
    }

    fn compute_force(&self, ctx: &SteeringContext<'_>, agent: &CrowdAgent) -> Vec3 {
        let p = self.params(agent.id);
        let Some(neighbors) = ctx.resolve(&p.targets) else {
            return Vec3::ZERO;
        };

        let (sum, count) = neighbors
            .active_others(agent.id)
            .fold((Vec3::ZERO, 0u32), |(sum, n), other| (sum + other.pos, n + 1));
        if count == 0 {
            return Vec3::ZERO;
        }

        let center = sum / count as f32;
        clamp_length_to((center - agent.pos) * p.weight, agent.max_acceleration)
    }
}

impl NeighborBehavior for CohesionBehavior {
    fn targets_mut(&mut self, agent: AgentId) -> &mut NeighborTargets {
        &mut self.params_mut(agent).targets
    }
}
