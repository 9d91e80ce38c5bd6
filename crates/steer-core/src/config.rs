//! Top-level crowd configuration.

use crate::{Arena, SimClock, SteerError, SteerResult, Tick};

/// Crowd configuration.
///
/// Typically loaded from a JSON file by the application crate and passed to
/// the crowd builder.  Every field has a default, so a partial file is fine
/// when the `serde` feature is on.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CrowdConfig {
    /// Upper bound on simultaneously registered agents.  Every buffer and
    /// parameter store is sized to this once, at construction.
    pub max_agents: usize,

    /// Simulated seconds per tick.
    pub tick_dt: f32,

    /// Total ticks simulated by a full run.
    pub total_ticks: u64,

    /// Seed for scenario setup.  The same seed always produces the same crowd.
    pub seed: u64,

    /// Worker thread count for the parallel update phase.  `None` uses all
    /// logical cores.
    pub num_threads: Option<usize>,

    /// Permanent arena budget in bytes (behaviors and parameter stores).
    pub arena_perm_bytes: usize,

    /// Transient arena budget in bytes (per-call scratch).
    pub arena_temp_bytes: usize,

    /// Report a snapshot every N ticks.  0 disables snapshots.
    pub snapshot_interval_ticks: u64,
}

impl Default for CrowdConfig {
    fn default() -> Self {
        Self {
            max_agents:              128,
            tick_dt:                 0.1,
            total_ticks:             600,
            seed:                    42,
            num_threads:             None,
            arena_perm_bytes:        1 << 20,
            arena_temp_bytes:        64 << 10,
            snapshot_interval_ticks: 10,
        }
    }
}

impl CrowdConfig {
    /// Reject configurations the crowd cannot run with.
    pub fn validate(&self) -> SteerResult<()> {
        if self.max_agents == 0 {
            return Err(SteerError::Config("max_agents must be at least 1".into()));
        }
        if self.max_agents > u32::MAX as usize {
            return Err(SteerError::Config(format!(
                "max_agents {} exceeds the AgentId range",
                self.max_agents
            )));
        }
        if !self.tick_dt.is_finite() || self.tick_dt < 0.0 {
            return Err(SteerError::Config(format!(
                "tick_dt must be a non-negative number, got {}",
                self.tick_dt
            )));
        }
        if self.num_threads == Some(0) {
            return Err(SteerError::Config("num_threads must be at least 1".into()));
        }
        Ok(())
    }

    /// The tick at which the run ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.tick_dt)
    }

    /// Construct the arena sized by this configuration.
    pub fn make_arena(&self) -> Arena {
        Arena::new(self.arena_perm_bytes, self.arena_temp_bytes)
    }
}
