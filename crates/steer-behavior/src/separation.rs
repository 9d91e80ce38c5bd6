//! Short-range repulsion from a list of neighbors.

use steer_agent::CrowdAgent;
use steer_core::{AgentId, EPSILON, Vec3};

use crate::{NeighborBehavior, NeighborTargets, ParamStore, SteeringBehavior, SteeringContext};

/// Per-agent separation settings.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeparationParams {
    /// Agents to keep away from.
    pub targets: NeighborTargets,
    pub weight: f32,
    /// Influence radius measured between footprints.  Non-positive means
    /// "use the agent's `collision_query_range`".
    pub distance: f32,
}

impl Default for SeparationParams {
    fn default() -> Self {
        Self {
            targets:  NeighborTargets::new(),
            weight:   1.0,
            distance: -1.0,
        }
    }
}

impl SeparationParams {
    /// Radius actually used for `agent`.
    #[inline]
    pub fn effective_distance(&self, agent: &CrowdAgent) -> f32 {
        if self.distance > 0.0 { self.distance } else { agent.collision_query_range }
    }
}

/// Pushes agents apart, harder the smaller the gap between footprints.
#[derive(Debug)]
pub struct SeparationBehavior {
    params: ParamStore<SeparationParams>,
}

impl SeparationBehavior {
    /// Replace the neighbor list.  Keeps the first
    /// [`MAX_NEIGHBOR_TARGETS`][crate::MAX_NEIGHBOR_TARGETS].
    pub fn set_targets(&mut self, agent: AgentId, targets: &[AgentId]) {
        self.set_neighbors(agent, targets);
    }

    pub fn set_weight(&mut self, agent: AgentId, weight: f32) {
        self.params_mut(agent).weight = weight;
    }

    pub fn set_distance(&mut self, agent: AgentId, distance: f32) {
        self.params_mut(agent).distance = distance;
    }
}

impl SteeringBehavior for SeparationBehavior {
    type Params = SeparationParams;
    const NAME: &'static str = "separation";

    fn from_store(params: ParamStore<SeparationParams>) -> Self {
        Self { params }
    }

    fn store(&self) -> &ParamStore<SeparationParams> {
        &self.params
    }

    fn store_mut(&mut self) -> &mut ParamStore<SeparationParams> {
        &mut self.params
    }

    fn into_store(self) -> ParamStore<SeparationParams> {
        self.params
    }

    fn compute_force(&self, ctx: &SteeringContext<'_>, agent: &CrowdAgent) -> Vec3 {
        let p = self.params(agent.id);
        let range = p.effective_distance(agent);
        if range <= 0.0 {
            return Vec3::ZERO;
        }
        let Some(neighbors) = ctx.resolve(&p.targets) else {
            return Vec3::ZERO;
        };

        let mut force = Vec3::ZERO;
        let mut count = 0u32;
        for other in neighbors.active_others(agent.id) {
            let away = agent.pos - other.pos;
            let gap = away.length() - agent.radius - other.radius;
            if gap > range || gap < EPSILON {
                continue;
            }
            let ratio = gap / range;
            let w = p.weight * (1.0 - ratio * ratio);
            force += away.normalize_or_zero() * (w / gap);
            count += 1;
        }

        if count == 0 { Vec3::ZERO } else { force / count as f32 }
    }
}

impl NeighborBehavior for SeparationBehavior {
    fn targets_mut(&mut self, agent: AgentId) -> &mut NeighborTargets {
        &mut self.params_mut(agent).targets
    }
}
