//! Per-agent parameter storage owned by a behavior instance.
//!
//! # Design
//!
//! One slot per possible `AgentId`, allocated once for the crowd's declared
//! maximum agent count.  The slot index *is* the agent identity, so lookup is
//! a bounds-checked array access with no hashing.  Slots are never added or
//! removed after construction.
//!
//! The store does not know which agents are live.  When the crowd reuses an
//! identity for a new agent it must [`reset`](ParamStore::reset) the slot.

use smallvec::SmallVec;
use steer_core::{AgentId, Arena, PermBlock};

/// Upper bound on the neighbor list a single agent can carry.
pub const MAX_NEIGHBOR_TARGETS: usize = 16;

/// Neighbor identities, stored inline (no heap) up to [`MAX_NEIGHBOR_TARGETS`].
pub type NeighborTargets = SmallVec<[AgentId; MAX_NEIGHBOR_TARGETS]>;

/// Fill `targets` from `ids`, keeping at most [`MAX_NEIGHBOR_TARGETS`].
pub(crate) fn assign_targets(targets: &mut NeighborTargets, ids: &[AgentId]) {
    let kept = ids.len().min(MAX_NEIGHBOR_TARGETS);
    if kept < ids.len() {
        log::debug!(
            "neighbor list truncated from {} to {MAX_NEIGHBOR_TARGETS} targets",
            ids.len()
        );
    }
    targets.clear();
    targets.extend_from_slice(&ids[..kept]);
}

/// Fixed-capacity, identity-indexed parameter slots.
#[derive(Debug)]
pub struct ParamStore<P> {
    slots: Vec<P>,
    block: PermBlock,
}

impl<P: Default> ParamStore<P> {
    /// Reserve `max_agents` slots plus `extra_bytes` of owner overhead from
    /// `arena`, then allocate the slots.
    ///
    /// Returns `None` if either the arena budget or the system allocator
    /// refuses; nothing stays reserved in that case.
    pub fn allocate(max_agents: usize, extra_bytes: usize, arena: &Arena) -> Option<Self> {
        let bytes = max_agents
            .checked_mul(size_of::<P>())?
            .checked_add(extra_bytes)?;
        let block = arena.alloc_perm(bytes)?;

        let mut slots = Vec::new();
        if slots.try_reserve_exact(max_agents).is_err() {
            arena.free_perm(block);
            return None;
        }
        slots.resize_with(max_agents, P::default);
        Some(Self { slots, block })
    }

    /// Restore the default parameters for `agent`.
    ///
    /// # Panics
    ///
    /// Panics if `agent` is outside the capacity (see [`get`](Self::get)).
    pub fn reset(&mut self, agent: AgentId) {
        self.slots[agent.index()] = P::default();
    }
}

impl<P> ParamStore<P> {
    /// Drop the slots and give the reserved bytes back to `arena`.
    pub fn release(self, arena: &Arena) {
        let Self { slots, block } = self;
        drop(slots);
        arena.free_perm(block);
    }

    /// Number of slots (the declared maximum agent count).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Bytes this store holds in the arena's permanent budget.
    #[inline]
    pub fn reserved_bytes(&self) -> usize {
        self.block.bytes()
    }

    /// Parameters for `agent`.
    ///
    /// # Panics
    ///
    /// `agent` must be below [`capacity`](Self::capacity).  Behaviors are
    /// sized to the crowd's maximum agent count, so an out-of-range identity
    /// is a caller bug and is not clamped.
    #[inline]
    pub fn get(&self, agent: AgentId) -> &P {
        &self.slots[agent.index()]
    }

    /// Mutable parameters for `agent`.  Same precondition as [`get`](Self::get).
    #[inline]
    pub fn get_mut(&mut self, agent: AgentId) -> &mut P {
        &mut self.slots[agent.index()]
    }
}
