//! `steer-crowd`: reference driver for steering behaviors.
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Update    : for every active agent with an attached behavior, call
//!                  update(old record, new record)
//!                  (parallel with the `parallel` feature).
//!   ② Integrate : vel = dvel for agents with a behavior; pos += vel × dt.
//!   ③ Swap      : the new buffer becomes the old one for the next tick.
//! ```
//!
//! Integration adds no damping.  A steered agent whose behavior stops
//! producing force keeps its last velocity: separated agents drift apart
//! indefinitely, and a seeker whose target is removed keeps its stale `dvel`.
//! Scenarios that want agents to settle must steer them to rest.
//!
//! Neighbor lists are not rebuilt automatically; call
//! [`Crowd::refresh_neighbors`] as often as the scenario needs.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs the update phase on Rayon's thread pool.          |
//! | `fx-hash`  | FxHash instead of SipHash for the neighbor grid.       |
//! | `serde`    | Serde derives on configuration and records.            |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use steer_agent::AgentParams;
//! use steer_behavior::SeekBehavior;
//! use steer_core::{CrowdConfig, Vec3};
//! use steer_crowd::{CrowdBuilder, NoopObserver};
//!
//! let mut crowd = CrowdBuilder::new(CrowdConfig::default()).build()?;
//! let seek = crowd.register_behavior::<SeekBehavior>()?;
//! let leader = crowd.add_agent(&AgentParams::default(), Vec3::ZERO)?;
//! let chaser = crowd.add_agent(&AgentParams::default(), Vec3::new(20.0, 0.0, 0.0))?;
//! crowd.attach(chaser, seek)?;
//! crowd.behavior_mut::<SeekBehavior>(seek)?.set_target(chaser, Some(leader));
//! crowd.run(&mut NoopObserver);
//! ```

pub mod builder;
pub mod crowd;
pub mod error;
pub mod neighbors;
pub mod observer;


pub use builder::CrowdBuilder;
pub use crowd::Crowd;
pub use error::{CrowdError, CrowdResult};
pub use neighbors::NeighborGrid;
pub use observer::{CrowdObserver, NoopObserver};
pub use steer_core::CrowdConfig;
