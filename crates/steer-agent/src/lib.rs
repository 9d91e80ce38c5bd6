//! `steer-agent`: agent records and double-buffered crowd state.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                     |
//! |---------------|--------------------------------------------------------------|
//! | [`agent`]     | `CrowdAgent` record, `AgentParams`                           |
//! | [`store`]     | `AgentBuffer` (identity-indexed registry), `CrowdBuffers`    |
//! | [`builder`]   | `CrowdBuffersBuilder` (fluent construction)                  |
//!
//! # Double buffering
//!
//! Steering reads the previous tick from the *old* buffer and writes the
//! next tick into the *new* buffer.  Nothing ever reads the new buffer of
//! another agent, so every agent can be updated independently within a
//! tick.  [`CrowdBuffers::swap`] is the barrier between ticks.

pub mod agent;
pub mod builder;
pub mod store;


pub use agent::{AgentParams, CrowdAgent};
pub use builder::CrowdBuffersBuilder;
pub use store::{AgentBuffer, CrowdBuffers};
