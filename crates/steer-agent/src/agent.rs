//! The per-agent kinematic record.

use steer_core::{AgentId, SteerError, SteerResult, Vec3};

/// Physical limits and sensing range of an agent.
///
/// Supplied when an agent is registered; copied into its [`CrowdAgent`]
/// record.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AgentParams {
    /// Collision footprint radius.
    pub radius: f32,
    /// Maximum speed (distance per second).
    pub max_speed: f32,
    /// Maximum acceleration (distance per second²).  Must be strictly
    /// positive for any agent that seeks a target.
    pub max_acceleration: f32,
    /// Sensing radius used for neighbor queries and as the default
    /// separation distance.
    pub collision_query_range: f32,
}

impl Default for AgentParams {
    fn default() -> Self {
        Self {
            radius:                0.6,
            max_speed:             3.5,
            max_acceleration:      8.0,
            collision_query_range: 7.2,
        }
    }
}

impl AgentParams {
    /// Reject negative or non-finite limits.
    pub fn validate(&self) -> SteerResult<()> {
        let fields = [
            ("radius", self.radius),
            ("max_speed", self.max_speed),
            ("max_acceleration", self.max_acceleration),
            ("collision_query_range", self.collision_query_range),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(SteerError::InvalidParam(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// One crowd member at a point in simulated time.
///
/// Behaviors read the old record and write only `dvel` and `desired_speed`
/// of the new record.  Everything else is owned by the crowd driver.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CrowdAgent {
    /// Slot in the crowd buffers.
    pub id: AgentId,

    /// Inactive records are stale: they are never a force source or a target.
    pub active: bool,

    pub pos: Vec3,
    pub vel: Vec3,

    /// Desired velocity produced by the agent's steering behavior.
    pub dvel: Vec3,

    /// Desired speed produced by the agent's steering behavior.
    pub desired_speed: f32,

    pub radius: f32,
    pub max_speed: f32,
    pub max_acceleration: f32,
    pub collision_query_range: f32,
}

impl CrowdAgent {
    /// An unregistered slot.
    pub fn inactive(id: AgentId) -> Self {
        Self {
            id,
            active:                false,
            pos:                   Vec3::ZERO,
            vel:                   Vec3::ZERO,
            dvel:                  Vec3::ZERO,
            desired_speed:         0.0,
            radius:                0.0,
            max_speed:             0.0,
            max_acceleration:      0.0,
            collision_query_range: 0.0,
        }
    }

    /// A freshly registered, stationary agent at `pos`.
    pub fn new(id: AgentId, params: &AgentParams, pos: Vec3) -> Self {
        Self {
            active: true,
            pos,
            radius: params.radius,
            max_speed: params.max_speed,
            max_acceleration: params.max_acceleration,
            collision_query_range: params.collision_query_range,
            ..Self::inactive(id)
        }
    }

    /// The limits this agent was registered with.
    pub fn params(&self) -> AgentParams {
        AgentParams {
            radius:                self.radius,
            max_speed:             self.max_speed,
            max_acceleration:      self.max_acceleration,
            collision_query_range: self.collision_query_range,
        }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}
