use steer_core::{BehaviorId, SteerError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrowdError {
    #[error(transparent)]
    Steer(#[from] SteerError),

    #[error("arena exhausted while allocating the {0} behavior")]
    AllocationFailed(&'static str),

    #[error("no behavior registered as {0}")]
    UnknownBehavior(BehaviorId),

    #[error("behavior {handle} is not a {expected} behavior")]
    BehaviorType {
        handle:   BehaviorId,
        expected: &'static str,
    },

    #[error("agent buffers hold {got} slots but max_agents is {expected}")]
    CapacityMismatch { expected: usize, got: usize },
}

pub type CrowdResult<T> = Result<T, CrowdError>;
