//! Framework error type.
//!
//! Only setup paths (registering agents, validating parameters, building a
//! crowd) return errors.  Per-tick steering never does: invalid inputs there
//! are skipped silently so a tick always completes.

use thiserror::Error;

use crate::AgentId;

/// The top-level error type for `steer-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum SteerError {
    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error("crowd is full (capacity {capacity})")]
    CrowdFull { capacity: usize },

    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for all `steer-*` crates.
pub type SteerResult<T> = Result<T, SteerError>;
