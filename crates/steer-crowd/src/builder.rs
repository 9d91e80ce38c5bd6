//! Fluent builder for constructing a [`Crowd`].

use steer_agent::CrowdBuffers;
use steer_core::{Arena, CrowdConfig};

use crate::{Crowd, CrowdError, CrowdResult};

/// Fluent builder for [`Crowd`].
///
/// # Required inputs
///
/// - [`CrowdConfig`]: capacity, tick length, arena budgets, …
///
/// # Optional inputs (have defaults)
///
/// | Method          | Default                                          |
/// |-----------------|--------------------------------------------------|
/// | `.buffers(b)`   | Empty `CrowdBuffers` with `max_agents` slots     |
/// | `.arena(a)`     | `config.make_arena()`                            |
///
/// # Example
///
/// ```rust,ignore
/// let buffers = CrowdBuffersBuilder::new(config.max_agents)
///     .agents(&AgentParams::default(), spawn_points.iter().copied())
///     .build()?;
/// let mut crowd = CrowdBuilder::new(config).buffers(buffers).build()?;
/// crowd.run(&mut NoopObserver);
/// ```
pub struct CrowdBuilder {
    config:  CrowdConfig,
    buffers: Option<CrowdBuffers>,
    arena:   Option<Arena>,
}

impl CrowdBuilder {
    pub fn new(config: CrowdConfig) -> Self {
        Self {
            config,
            buffers: None,
            arena:   None,
        }
    }

    /// Start from pre-populated buffers (must have `max_agents` slots).
    pub fn buffers(mut self, buffers: CrowdBuffers) -> Self {
        self.buffers = Some(buffers);
        self
    }

    /// Use `arena` instead of one sized from the configuration.
    pub fn arena(mut self, arena: Arena) -> Self {
        self.arena = Some(arena);
        self
    }

    /// Validate inputs and return a ready-to-run [`Crowd`] with no
    /// behaviors registered.
    pub fn build(self) -> CrowdResult<Crowd> {
        self.config.validate()?;
        let max_agents = self.config.max_agents;

        let buffers = match self.buffers {
            Some(b) => {
                if b.capacity() != max_agents {
                    return Err(CrowdError::CapacityMismatch {
                        expected: max_agents,
                        got:      b.capacity(),
                    });
                }
                b
            }
            None => CrowdBuffers::new(max_agents),
        };
        let arena = self.arena.unwrap_or_else(|| self.config.make_arena());

        log::debug!(
            "crowd ready: {} / {max_agents} agents, dt {} s, arena {} B perm + {} B temp",
            buffers.old().active_count(),
            self.config.tick_dt,
            arena.perm_capacity(),
            arena.temp_capacity()
        );

        Ok(Crowd {
            clock:       self.config.make_clock(),
            config:      self.config,
            buffers,
            arena,
            behaviors:   Vec::new(),
            attachments: vec![None; max_agents],
        })
    }
}
