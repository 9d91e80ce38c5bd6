//! Fluent builder for constructing `CrowdBuffers` with an initial population.
//!
//! # Usage
//!
//! ```rust
//! use steer_agent::{AgentParams, CrowdBuffersBuilder};
//! use steer_core::Vec3;
//!
//! let buffers = CrowdBuffersBuilder::new(64)
//!     .agent(AgentParams::default(), Vec3::ZERO)
//!     .agent(AgentParams::default(), Vec3::new(4.0, 0.0, 0.0))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(buffers.capacity(), 64);
//! assert_eq!(buffers.old().active_count(), 2);
//! ```

use steer_core::{SteerResult, Vec3};

use crate::{AgentParams, CrowdBuffers};

/// Fluent builder for [`CrowdBuffers`].
///
/// Both buffers are allocated to full capacity up front; the initial agents
/// take slots `0..n` in the order they were added.
pub struct CrowdBuffersBuilder {
    max_agents: usize,
    agents:     Vec<(AgentParams, Vec3)>,
}

impl CrowdBuffersBuilder {
    pub fn new(max_agents: usize) -> Self {
        Self {
            max_agents,
            agents: Vec::new(),
        }
    }

    /// Queue one agent for registration.
    pub fn agent(mut self, params: AgentParams, pos: Vec3) -> Self {
        self.agents.push((params, pos));
        self
    }

    /// Queue many agents sharing the same limits.
    pub fn agents(mut self, params: &AgentParams, positions: impl IntoIterator<Item = Vec3>) -> Self {
        self.agents
            .extend(positions.into_iter().map(|pos| (params.clone(), pos)));
        self
    }

    /// Allocate the buffers and register every queued agent.
    ///
    /// Fails on the first invalid parameter set, or with `CrowdFull` when
    /// more agents were queued than `max_agents`.
    pub fn build(self) -> SteerResult<CrowdBuffers> {
        let mut buffers = CrowdBuffers::new(self.max_agents);
        for (params, pos) in &self.agents {
            buffers.add_agent(params, *pos)?;
        }
        Ok(buffers)
    }
}
