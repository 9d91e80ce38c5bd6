//! `steer-core`: foundational types for the `steer` crowd steering framework.
//!
//! This crate is a dependency of every other `steer-*` crate.  It has no
//! `steer-*` dependencies and few external ones (`glam`, `rand`, `log`,
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `BehaviorId`                               |
//! | [`math`]        | `Vec3` re-export, `EPSILON`, length clamping          |
//! | [`time`]        | `Tick`, `SimClock`                                    |
//! | [`config`]      | `CrowdConfig`                                         |
//! | [`arena`]       | `Arena` fixed-capacity allocation budget              |
//! | [`rng`]         | `SimRng` (deterministic scenario setup)               |
//! | [`error`]       | `SteerError`, `SteerResult`                           |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod arena;
pub mod config;
pub mod error;
pub mod ids;
pub mod math;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use arena::{Arena, PermBlock, TempBlock};
pub use config::CrowdConfig;
pub use error::{SteerError, SteerResult};
pub use ids::{AgentId, BehaviorId};
pub use math::{EPSILON, Vec3};
pub use rng::SimRng;
pub use time::{SimClock, Tick};
