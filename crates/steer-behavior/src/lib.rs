//! `steer-behavior`: pluggable steering behaviors.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                        |
//! |-----------------|-----------------------------------------------------------------|
//! | [`params`]      | `ParamStore<P>`: identity-indexed, arena-backed parameters      |
//! | [`context`]     | `SteeringContext<'a>`: old buffer + arena shared by all calls   |
//! | [`behavior`]    | `SteeringBehavior`, `NeighborBehavior`, erased `DynBehavior`    |
//! | [`kinematics`]  | `SteeringOutput`, `arrive`, `integrate` free functions          |
//! | [`seek`]        | `SeekBehavior`: pursuit with arrival                            |
//! | [`separation`]  | `SeparationBehavior`: short-range repulsion                     |
//! | [`alignment`]   | `AlignmentBehavior`: match neighbors' velocity                  |
//! | [`cohesion`]    | `CohesionBehavior`: steer toward neighbors' center              |
//!
//! # Design notes
//!
//! Each tick the crowd driver calls [`SteeringBehavior::update`] once per
//! agent with the agent's previous-tick record and its next-tick record.
//! The behavior:
//!
//! 1. reads only the old buffer (through [`SteeringContext`]),
//! 2. computes a force ([`SteeringBehavior::compute_force`]),
//! 3. turns the force into a desired velocity
//!    ([`SteeringBehavior::apply_force`]) and writes `dvel` and
//!    `desired_speed` of the one record it was given.
//!
//! Nothing else is written, so agents can be updated in any order or in
//! parallel.  Behaviors take `&self` during updates and are `Send + Sync`.

pub mod alignment;
pub mod behavior;
pub mod cohesion;
pub mod context;
pub mod kinematics;
pub mod params;
pub mod seek;
pub mod separation;

#[cfg(test)]
mod tests;

pub use alignment::{AlignmentBehavior, AlignmentParams};
pub use behavior::{DynBehavior, NeighborBehavior, SteeringBehavior};
pub use cohesion::{CohesionBehavior, CohesionParams};
pub use context::{ResolvedAgents, SteeringContext};
pub use kinematics::{SteeringOutput, arrive, braking_distance, integrate};
pub use params::{MAX_NEIGHBOR_TARGETS, NeighborTargets, ParamStore};
pub use seek::{SeekBehavior, SeekParams};
pub use separation::{SeparationBehavior, SeparationParams};
