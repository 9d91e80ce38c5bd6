//! The `SteeringBehavior` trait: the extension point for force models.

use std::any::Any;

use steer_agent::CrowdAgent;
use steer_core::{AgentId, Arena, Vec3};

use crate::params::assign_targets;
use crate::{NeighborTargets, ParamStore, SteeringContext, integrate};

/// A pluggable force model attached to crowd agents.
///
/// Each implementation owns a [`ParamStore`] with one `Params` slot per
/// possible agent.  The lifecycle mirrors the crowd's:
///
/// - [`allocate`](Self::allocate) once at setup, sized to the maximum agent
///   count, from the crowd's [`Arena`];
/// - [`update`](Self::update) once per attached agent per tick;
/// - [`free`](Self::free) at shutdown.
///
/// # Required methods
///
/// The store accessors and [`compute_force`](Self::compute_force).
/// [`apply_force`](Self::apply_force) defaults to plain integration with a
/// speed clamp; behaviors with a destination override it (see
/// [`SeekBehavior`][crate::SeekBehavior]).
///
/// # Thread safety
///
/// `update` takes `&self` and may run for many agents at once.  All
/// per-agent state lives in the parameter store (read-only during updates)
/// or in the agent records.
///
/// # Example
///
/// ```rust,ignore
/// struct Drift { params: ParamStore<DriftParams> }
///
/// impl SteeringBehavior for Drift {
///     type Params = DriftParams;
///     const NAME: &'static str = "drift";
///
///     fn from_store(params: ParamStore<DriftParams>) -> Self { Self { params } }
///     fn store(&self) -> &ParamStore<DriftParams> { &self.params }
///     fn store_mut(&mut self) -> &mut ParamStore<DriftParams> { &mut self.params }
///     fn into_store(self) -> ParamStore<DriftParams> { self.params }
///
///     fn compute_force(&self, _ctx: &SteeringContext<'_>, agent: &CrowdAgent) -> Vec3 {
///         self.params(agent.id).wind
///     }
/// }
/// ```
pub trait SteeringBehavior: Send + Sync + 'static {
    /// Tunable inputs for one agent.
    type Params: Default + Send + Sync + 'static;

    /// Short label used in logs.
    const NAME: &'static str;

    /// Wrap a freshly allocated store.
    fn from_store(store: ParamStore<Self::Params>) -> Self
    where
        Self: Sized;

    fn store(&self) -> &ParamStore<Self::Params>;

    fn store_mut(&mut self) -> &mut ParamStore<Self::Params>;

    /// Give up the store so its arena budget can be returned.
    fn into_store(self) -> ParamStore<Self::Params>
    where
        Self: Sized;

    /// Construct the behavior with a parameter store for `max_agents`.
    ///
    /// Returns `None`, with nothing left reserved, if `arena` cannot hold
    /// the behavior plus its store.
    fn allocate(max_agents: usize, arena: &Arena) -> Option<Self>
    where
        Self: Sized,
    {
        match ParamStore::allocate(max_agents, size_of::<Self>(), arena) {
            Some(store) => {
                log::debug!(
                    "{}: allocated {max_agents} parameter slots ({} B)",
                    Self::NAME,
                    store.reserved_bytes()
                );
                Some(Self::from_store(store))
            }
            None => {
                log::warn!(
                    "{}: arena refused parameter store for {max_agents} agents",
                    Self::NAME
                );
                None
            }
        }
    }

    /// Release a behavior back to `arena`.  `None` is a no-op.
    fn free(behavior: Option<Self>, arena: &Arena)
    where
        Self: Sized,
    {
        if let Some(behavior) = behavior {
            behavior.into_store().release(arena);
        }
    }

    /// Parameters for `agent`.
    ///
    /// # Panics
    ///
    /// `agent` must be below the capacity the behavior was allocated with.
    #[inline]
    fn params(&self, agent: AgentId) -> &Self::Params {
        self.store().get(agent)
    }

    /// Mutable parameters for `agent`.  Same precondition as [`params`](Self::params).
    #[inline]
    fn params_mut(&mut self, agent: AgentId) -> &mut Self::Params {
        self.store_mut().get_mut(agent)
    }

    /// Compute this behavior's contribution for one agent and write it into
    /// `new` (`dvel` and `desired_speed` only).
    ///
    /// `old` and `new` must be the previous and next record of the same
    /// agent; `dt` must be non-negative.
    fn update(&self, ctx: &SteeringContext<'_>, old: &CrowdAgent, new: &mut CrowdAgent, dt: f32) {
        debug_assert_eq!(old.id, new.id, "old and new records of different agents");
        let force = self.compute_force(ctx, old);
        self.apply_force(ctx, old, new, force, dt);
    }

    /// The raw steering force for `agent`, from previous-tick state only.
    fn compute_force(&self, ctx: &SteeringContext<'_>, agent: &CrowdAgent) -> Vec3;

    /// Convert `force` into the next-tick desired velocity.
    fn apply_force(
        &self,
        _ctx:  &SteeringContext<'_>,
        old:   &CrowdAgent,
        new:   &mut CrowdAgent,
        force: Vec3,
        dt:    f32,
    ) {
        integrate(old, force, dt).write_to(new);
    }
}

/// A behavior driven by a per-agent neighbor list.
///
/// Lets a crowd driver refill the lists from a spatial query without knowing
/// the concrete parameter type.
pub trait NeighborBehavior: SteeringBehavior {
    fn targets_mut(&mut self, agent: AgentId) -> &mut NeighborTargets;

    /// Replace `agent`'s neighbor list, keeping at most
    /// [`MAX_NEIGHBOR_TARGETS`][crate::MAX_NEIGHBOR_TARGETS] entries.
    fn set_neighbors(&mut self, agent: AgentId, ids: &[AgentId]) {
        assign_targets(self.targets_mut(agent), ids);
    }
}

// ── Type erasure ──────────────────────────────────────────────────────────────

/// Object-safe view of any [`SteeringBehavior`], so a crowd can hold
/// behaviors of different types side by side.
///
/// Sealed: the blanket impl below is the only implementation.  Recover the
/// concrete type with `as_any().downcast_ref::<B>()`.
pub trait DynBehavior: Send + Sync + 'static + sealed::Sealed {
    /// [`SteeringBehavior::NAME`] of the concrete type.
    fn behavior_name(&self) -> &'static str;

    /// [`SteeringBehavior::update`].
    fn update_agent(&self, ctx: &SteeringContext<'_>, old: &CrowdAgent, new: &mut CrowdAgent, dt: f32);

    /// Restore the default parameters for `agent`.
    fn reset_agent(&mut self, agent: AgentId);

    /// Parameter slots (the maximum agent count it was allocated for).
    fn slot_count(&self) -> usize;

    /// [`SteeringBehavior::free`].
    fn release(self: Box<Self>, arena: &Arena);

    #[doc(hidden)]
    fn as_any(&self) -> &dyn Any;

    #[doc(hidden)]
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

mod sealed {
    pub trait Sealed {}
}

impl<B: SteeringBehavior> sealed::Sealed for B {}

impl<B: SteeringBehavior> DynBehavior for B {
    fn behavior_name(&self) -> &'static str {
        B::NAME
    }

    #[inline]
    fn update_agent(&self, ctx: &SteeringContext<'_>, old: &CrowdAgent, new: &mut CrowdAgent, dt: f32) {
        SteeringBehavior::update(self, ctx, old, new, dt);
    }

    fn reset_agent(&mut self, agent: AgentId) {
        self.store_mut().reset(agent);
    }

    fn slot_count(&self) -> usize {
        self.store().capacity()
    }

    fn release(self: Box<Self>, arena: &Arena) {
        B::free(Some(*self), arena);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
