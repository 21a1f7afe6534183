//! `ssa-core`: foundational types for the `rust_ssa` simulation engine.
//!
//! This crate is a dependency of every other `ssa-*` crate.  It has no
//! `ssa-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `TransitionId`                             |
//! | [`time`]        | `SimTime`, `SimConfig`                                |
//! | [`rng`]         | `UniformSource` trait, `SimRng`, `ScriptedUniform`    |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use ids::{AgentId, TransitionId};
pub use rng::{ScriptedUniform, SimRng, UniformSource};
pub use time::{SimConfig, SimTime};
