//! Identity-indexed agent storage: `AgentBuffer` and the `CrowdBuffers` pair.
//!
//! # Why two buffers?
//!
//! During the update phase every behavior needs shared read access to the
//! whole previous tick (targets, neighbors) and exclusive write access to one
//! agent's next-tick record.  Holding those in two separate buffers lets the
//! borrow checker hand out `&old` and `&mut new` at the same time:
//!
//! ```ignore
//! let (old, new) = buffers.split_mut();
//! for (prev, next) in old.as_slice().iter().zip(new.as_mut_slice()) {
//!     behavior.update(&ctx, prev, next, dt);
//! }
//! buffers.swap();
//! ```

use steer_core::{AgentId, SteerError, SteerResult, Vec3};

use crate::{AgentParams, CrowdAgent};

// ── AgentBuffer ───────────────────────────────────────────────────────────────

/// Fixed-capacity array of [`CrowdAgent`] records; `AgentId` is the index.
///
/// Every slot exists from construction on.  Unregistered slots hold an
/// inactive record, so lookups never allocate and registering an agent is a
/// plain overwrite.
#[derive(Clone, Debug)]
pub struct AgentBuffer {
    agents: Vec<CrowdAgent>,
}

impl AgentBuffer {
    /// A buffer with `max_agents` inactive slots.
    pub fn new(max_agents: usize) -> Self {
        let agents = (0..max_agents as u32)
            .map(|i| CrowdAgent::inactive(AgentId(i)))
            .collect();
        Self { agents }
    }

    /// Number of slots (the declared maximum agent count).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.agents.len()
    }

    /// Number of currently active agents.  O(capacity).
    pub fn active_count(&self) -> usize {
        self.agents.iter().filter(|a| a.active).count()
    }

    /// Record for `id`, active or not.  `None` if `id` is out of range.
    #[inline]
    pub fn get(&self, id: AgentId) -> Option<&CrowdAgent> {
        self.agents.get(id.index())
    }

    #[inline]
    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut CrowdAgent> {
        self.agents.get_mut(id.index())
    }

    /// Resolve an identity list into record references, appending to `out`.
    ///
    /// Identities outside the buffer are skipped; inactive records are kept
    /// (callers decide whether a stale agent matters to them).  Returns the
    /// number of references appended.
    pub fn get_agents<'a, E>(&'a self, ids: &[AgentId], out: &mut E) -> usize
    where
        E: Extend<&'a CrowdAgent>,
    {
        let mut resolved = 0;
        out.extend(ids.iter().filter_map(|&id| self.get(id)).inspect(|_| resolved += 1));
        resolved
    }

    /// All slots in identity order.
    #[inline]
    pub fn as_slice(&self) -> &[CrowdAgent] {
        &self.agents
    }

    /// All slots in identity order, mutably.  Used by the update phase to
    /// hand each worker a disjoint `&mut CrowdAgent`.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [CrowdAgent] {
        &mut self.agents
    }

    /// Iterator over active agents in ascending identity order.
    pub fn iter_active(&self) -> impl Iterator<Item = &CrowdAgent> + '_ {
        self.agents.iter().filter(|a| a.active)
    }

    /// Register an agent in the lowest free slot.
    pub fn add_agent(&mut self, params: &AgentParams, pos: Vec3) -> SteerResult<AgentId> {
        params.validate()?;
        let slot = self
            .agents
            .iter()
            .position(|a| !a.active)
            .ok_or(SteerError::CrowdFull { capacity: self.capacity() })?;
        let id = AgentId(slot as u32);
        self.agents[slot] = CrowdAgent::new(id, params, pos);
        Ok(id)
    }

    /// Write an already-built record into its slot.
    fn put(&mut self, agent: CrowdAgent) {
        let slot = agent.id.index();
        self.agents[slot] = agent;
    }

    /// Unregister `id`, leaving an inactive record behind.
    pub fn remove_agent(&mut self, id: AgentId) -> SteerResult<()> {
        match self.agents.get_mut(id.index()) {
            Some(agent) if agent.active => {
                *agent = CrowdAgent::inactive(id);
                Ok(())
            }
            _ => Err(SteerError::AgentNotFound(id)),
        }
    }
}

// ── CrowdBuffers ──────────────────────────────────────────────────────────────

/// The old/new pair of [`AgentBuffer`]s.
///
/// Registration and removal write both buffers so the two never disagree
/// about which slots are live.
#[derive(Clone, Debug)]
pub struct CrowdBuffers {
    old: AgentBuffer,
    new: AgentBuffer,
}

impl CrowdBuffers {
    pub fn new(max_agents: usize) -> Self {
        let old = AgentBuffer::new(max_agents);
        let new = old.clone();
        Self { old, new }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.old.capacity()
    }

    /// The previous tick: what every behavior reads.
    #[inline]
    pub fn old(&self) -> &AgentBuffer {
        &self.old
    }

    /// The tick being built.
    #[inline]
    pub fn next(&self) -> &AgentBuffer {
        &self.new
    }

    #[inline]
    pub fn next_mut(&mut self) -> &mut AgentBuffer {
        &mut self.new
    }

    /// Shared old buffer plus exclusive new buffer, for the update phase.
    #[inline]
    pub fn split_mut(&mut self) -> (&AgentBuffer, &mut AgentBuffer) {
        (&self.old, &mut self.new)
    }

    /// Publish the new buffer as the old one.
    ///
    /// The new buffer is then re-seeded from the freshly published state so
    /// fields a tick does not write carry over unchanged.  `clone_from`
    /// reuses the existing allocation.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.old, &mut self.new);
        self.new.clone_from(&self.old);
    }

    pub fn add_agent(&mut self, params: &AgentParams, pos: Vec3) -> SteerResult<AgentId> {
        let id = self.old.add_agent(params, pos)?;
        let record = self.old.as_slice()[id.index()].clone();
        self.new.put(record);
        Ok(id)
    }

    pub fn remove_agent(&mut self, id: AgentId) -> SteerResult<()> {
        self.old.remove_agent(id)?;
        self.new.put(CrowdAgent::inactive(id));
        Ok(())
    }

    /// Apply `edit` to `id`'s record in both buffers.
    ///
    /// `edit` must not change `id` or `active`; use
    /// [`add_agent`](Self::add_agent) and [`remove_agent`](Self::remove_agent)
    /// for that.
    pub fn edit_agent<F>(&mut self, id: AgentId, mut edit: F) -> SteerResult<()>
    where
        F: FnMut(&mut CrowdAgent),
    {
        match self.old.get_mut(id) {
            Some(agent) if agent.active => edit(agent),
            _ => return Err(SteerError::AgentNotFound(id)),
        }
        if let Some(agent) = self.new.get_mut(id) {
            edit(agent);
        }
        Ok(())
    }
}
