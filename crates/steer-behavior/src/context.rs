//! Read-only crowd state passed to every behavior update.

use smallvec::SmallVec;
use steer_agent::{AgentBuffer, CrowdAgent};
use steer_core::{AgentId, Arena, TempBlock};

use crate::MAX_NEIGHBOR_TARGETS;

/// A read-only view of the previous tick, shared by every
/// [`SteeringBehavior`][crate::SteeringBehavior] call of one update phase.
///
/// # Lifetimes
///
/// Both borrows live for one tick's update phase.  The crowd driver never
/// hands out mutable access to the old buffer while a context is live, which
/// is what makes parallel updates safe.
#[derive(Clone, Copy)]
pub struct SteeringContext<'a> {
    /// Previous-tick records of every agent, indexed by `AgentId`.
    pub agents: &'a AgentBuffer,

    /// Budget for per-call scratch.
    pub arena: &'a Arena,
}

impl<'a> SteeringContext<'a> {
    #[inline]
    pub fn new(agents: &'a AgentBuffer, arena: &'a Arena) -> Self {
        Self { agents, arena }
    }

    /// Resolve a weak reference: the record for `id` if it exists and is active.
    #[inline]
    pub fn active_agent(&self, id: AgentId) -> Option<&'a CrowdAgent> {
        self.agents.get(id).filter(|a| a.active)
    }

    /// Resolve a neighbor list into record references.
    ///
    /// The scratch list is charged to the arena's transient budget until the
    /// returned value drops.  Returns `None` when there is nothing to
    /// resolve, no identity resolves, or the arena refuses the scratch.
    pub fn resolve(&self, ids: &[AgentId]) -> Option<ResolvedAgents<'a>> {
        if ids.is_empty() {
            return None;
        }
        let scratch = self
            .arena
            .alloc_temp(ids.len() * size_of::<&CrowdAgent>())?;
        let mut agents = SmallVec::new();
        if self.agents.get_agents(ids, &mut agents) == 0 {
            return None;
        }
        Some(ResolvedAgents { agents, _scratch: scratch })
    }
}

/// Neighbor records resolved for one update call.
pub struct ResolvedAgents<'a> {
    agents:   SmallVec<[&'a CrowdAgent; MAX_NEIGHBOR_TARGETS]>,
    _scratch: TempBlock<'a>,
}

impl<'a> ResolvedAgents<'a> {
    /// Every resolved record, active or not, in list order.
    #[inline]
    pub fn all(&self) -> &[&'a CrowdAgent] {
        &self.agents
    }

    /// Active records other than `agent` itself.
    pub fn active_others(&self, agent: AgentId) -> impl Iterator<Item = &'a CrowdAgent> + '_ {
        self.agents
            .iter()
            .copied()
            .filter(move |a| a.active && a.id != agent)
    }
}
