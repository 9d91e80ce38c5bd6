//! The `Crowd` struct and its tick loop.

use steer_agent::{AgentBuffer, AgentParams, CrowdAgent, CrowdBuffers};
use steer_behavior::{DynBehavior, NeighborBehavior, SteeringBehavior, SteeringContext};
use steer_core::{AgentId, Arena, BehaviorId, CrowdConfig, SimClock, SteerError, Tick, Vec3};

use crate::{CrowdError, CrowdObserver, CrowdResult, NeighborGrid};

/// Owns the agent buffers, the arena, and every registered behavior, and
/// drives the double-buffered tick loop.
///
/// Each agent has at most one behavior attached.  Agents without one keep
/// their velocity and coast.
///
/// Create via [`CrowdBuilder`][crate::CrowdBuilder].
pub struct Crowd {
    /// Global configuration (capacity, tick length, run length, …).
    pub config: CrowdConfig,

    /// Simulation clock, advanced once per [`step`](Self::step).
    pub clock: SimClock,

    pub(crate) buffers:     CrowdBuffers,
    pub(crate) arena:       Arena,
    pub(crate) behaviors:   Vec<Box<dyn DynBehavior>>,
    /// Indexed by `AgentId`.
    pub(crate) attachments: Vec<Option<BehaviorId>>,
}

impl Crowd {
    // ── Behaviors ─────────────────────────────────────────────────────────

    /// Allocate a `B` sized for `config.max_agents` and register it.
    ///
    /// Fails with [`CrowdError::AllocationFailed`] if the arena cannot hold
    /// it; the crowd is left unchanged.
    pub fn register_behavior<B: SteeringBehavior>(&mut self) -> CrowdResult<BehaviorId> {
        let handle = BehaviorId::try_from(self.behaviors.len()).map_err(|_| {
            SteerError::Config(format!("more than {} behaviors registered", u16::MAX))
        })?;
        let behavior = B::allocate(self.buffers.capacity(), &self.arena)
            .ok_or(CrowdError::AllocationFailed(B::NAME))?;
        self.behaviors.push(Box::new(behavior));
        log::debug!("registered {} behavior as {handle}", B::NAME);
        Ok(handle)
    }

    /// Typed access to a registered behavior, e.g. to set parameters.
    pub fn behavior<B: SteeringBehavior>(&self, handle: BehaviorId) -> CrowdResult<&B> {
        self.behaviors
            .get(handle.index())
            .ok_or(CrowdError::UnknownBehavior(handle))?
            .as_any()
            .downcast_ref::<B>()
            .ok_or(CrowdError::BehaviorType { handle, expected: B::NAME })
    }

    pub fn behavior_mut<B: SteeringBehavior>(&mut self, handle: BehaviorId) -> CrowdResult<&mut B> {
        self.behaviors
            .get_mut(handle.index())
            .ok_or(CrowdError::UnknownBehavior(handle))?
            .as_any_mut()
            .downcast_mut::<B>()
            .ok_or(CrowdError::BehaviorType { handle, expected: B::NAME })
    }

    /// Number of registered behaviors.
    #[inline]
    pub fn behavior_count(&self) -> usize {
        self.behaviors.len()
    }

    /// Attach `handle` to `agent`, replacing any previous attachment.
    ///
    /// The agent's parameter slot in the new behavior is reset to defaults,
    /// so configure it after attaching.
    pub fn attach(&mut self, agent: AgentId, handle: BehaviorId) -> CrowdResult<()> {
        if handle.index() >= self.behaviors.len() {
            return Err(CrowdError::UnknownBehavior(handle));
        }
        self.require_active(agent)?;
        self.detach(agent)?;

        let behavior = &mut self.behaviors[handle.index()];
        behavior.reset_agent(agent);
        self.attachments[agent.index()] = Some(handle);
        log::debug!("attached {agent} to {} ({handle})", behavior.behavior_name());
        Ok(())
    }

    /// Detach whatever behavior `agent` has.  Returns the old handle.
    pub fn detach(&mut self, agent: AgentId) -> CrowdResult<Option<BehaviorId>> {
        let slot = self
            .attachments
            .get_mut(agent.index())
            .ok_or(SteerError::AgentNotFound(agent))?;
        let old = slot.take();
        if let Some(handle) = old {
            self.behaviors[handle.index()].reset_agent(agent);
        }
        Ok(old)
    }

    /// The behavior attached to `agent`, if any.
    #[inline]
    pub fn attachment(&self, agent: AgentId) -> Option<BehaviorId> {
        self.attachments.get(agent.index()).copied().flatten()
    }

    // ── Agents ────────────────────────────────────────────────────────────

    /// Register an agent at `pos` at rest.  Takes the lowest free slot.
    pub fn add_agent(&mut self, params: &AgentParams, pos: Vec3) -> CrowdResult<AgentId> {
        let id = self.buffers.add_agent(params, pos)?;
        log::trace!("added {id} at {pos}");
        Ok(id)
    }

    /// Unregister `agent`.  Its behavior slot is reset and the identity may
    /// be handed out again.  Other agents still referencing it see an
    /// inactive record.
    pub fn remove_agent(&mut self, agent: AgentId) -> CrowdResult<()> {
        self.buffers.remove_agent(agent)?;
        self.detach(agent)?;
        log::trace!("removed {agent}");
        Ok(())
    }

    /// State as of the last completed tick.
    #[inline]
    pub fn agents(&self) -> &AgentBuffer {
        self.buffers.old()
    }

    /// Edit an agent between ticks (teleport, change limits, …).
    ///
    /// The edit lands in both buffers, so the next update phase sees it.
    pub fn edit_agent<F>(&mut self, agent: AgentId, edit: F) -> CrowdResult<()>
    where
        F: FnMut(&mut CrowdAgent),
    {
        self.buffers.edit_agent(agent, edit)?;
        Ok(())
    }

    #[inline]
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    #[inline]
    pub fn current_tick(&self) -> Tick {
        self.clock.current_tick
    }

    // ── Neighbor lists ────────────────────────────────────────────────────

    /// Rebuild the neighbor lists of every agent attached to `handle`.
    ///
    /// Each list holds the nearest active agents within that agent's
    /// `collision_query_range`.  Returns the number of lists written.
    pub fn refresh_neighbors<B: NeighborBehavior>(&mut self, handle: BehaviorId) -> CrowdResult<usize> {
        let agents = self.buffers.old();
        let cell_size = agents
            .iter_active()
            .map(|a| a.collision_query_range)
            .fold(0.0_f32, f32::max);
        let grid = NeighborGrid::build(agents, cell_size);

        let behavior = self.behaviors
            .get_mut(handle.index())
            .ok_or(CrowdError::UnknownBehavior(handle))?
            .as_any_mut()
            .downcast_mut::<B>()
            .ok_or(CrowdError::BehaviorType { handle, expected: B::NAME })?;

        let mut written = 0;
        for agent in agents.iter_active() {
            if self.attachments[agent.id.index()] != Some(handle) {
                continue;
            }
            let found = grid.nearest(agents, agent, agent.collision_query_range);
            behavior.set_neighbors(agent.id, &found);
            written += 1;
        }
        log::trace!(
            "refreshed {written} {} neighbor lists over {} cells",
            B::NAME,
            grid.occupied_cells()
        );
        Ok(written)
    }

    // ── Tick loop ─────────────────────────────────────────────────────────

    /// Run from the current tick to `config.end_tick()`.
    pub fn run<O: CrowdObserver>(&mut self, observer: &mut O) {
        while self.clock.current_tick < self.config.end_tick() {
            self.step(observer);
        }
        observer.on_run_end(self.clock.current_tick);
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    pub fn run_ticks<O: CrowdObserver>(&mut self, n: u64, observer: &mut O) {
        for _ in 0..n {
            self.step(observer);
        }
    }

    /// Advance one tick.  Returns the number of agents whose behavior ran.
    pub fn step<O: CrowdObserver>(&mut self, observer: &mut O) -> usize {
        let now = self.clock.current_tick;
        let dt = self.clock.dt;
        observer.on_tick_start(now);

        let updated = self.update_phase(dt);
        self.integrate_phase(dt);
        self.buffers.swap();

        observer.on_tick_end(now, updated);
        let interval = self.config.snapshot_interval_ticks;
        if interval > 0 && now.0.is_multiple_of(interval) {
            observer.on_snapshot(now, self.buffers.old());
        }
        log::trace!("{now}: steered {updated} agents");

        self.clock.advance();
        updated
    }

    /// Call every attached behavior once per active agent.
    ///
    /// Reads only the old buffer; each call writes only its own agent's new
    /// record.
    fn update_phase(&mut self, dt: f32) -> usize {
        // Explicit field borrows so the borrow checker sees disjoint access.
        let (old, new) = self.buffers.split_mut();
        let ctx = SteeringContext::new(old, &self.arena);
        let behaviors = self.behaviors.as_slice();
        let attachments = self.attachments.as_slice();

        #[cfg(not(feature = "parallel"))]
        {
            new.as_mut_slice()
                .iter_mut()
                .zip(old.as_slice())
                .zip(attachments)
                .filter_map(|((next, prev), handle)| {
                    let handle = (*handle).filter(|_| prev.active)?;
                    behaviors[handle.index()].update_agent(&ctx, prev, next, dt);
                    Some(())
                })
                .count()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            new.as_mut_slice()
                .par_iter_mut()
                .zip(old.as_slice().par_iter())
                .zip(attachments.par_iter())
                .filter_map(|((next, prev), handle)| {
                    let handle = (*handle).filter(|_| prev.active)?;
                    behaviors[handle.index()].update_agent(&ctx, prev, next, dt);
                    Some(())
                })
                .count()
        }
    }

    /// Adopt the desired velocity of steered agents and move everyone.
    ///
    /// No damping: once a behavior's force falls to zero the agent keeps the
    /// velocity it last reached.
    fn integrate_phase(&mut self, dt: f32) {
        let attachments = &self.attachments;
        for agent in self.buffers.next_mut().as_mut_slice() {
            if !agent.active {
                continue;
            }
            if attachments[agent.id.index()].is_some() {
                agent.vel = agent.dvel;
            }
            agent.pos += agent.vel * dt;
        }
    }

    // ── Teardown ──────────────────────────────────────────────────────────

    /// Free every behavior back to the arena and hand the arena back.
    pub fn shutdown(mut self) -> Arena {
        for behavior in self.behaviors.drain(..) {
            log::debug!("freeing {} behavior", behavior.behavior_name());
            behavior.release(&self.arena);
        }
        self.arena
    }

    fn require_active(&self, agent: AgentId) -> CrowdResult<()> {
        match self.buffers.old().get(agent) {
            Some(a) if a.active => Ok(()),
            _ => Err(SteerError::AgentNotFound(agent).into()),
        }
    }
}
