//! `ssa-agent`: agent population storage for the `rust_ssa` engine.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`population`]  | `Population<S>` (states + contacts), `PopulationSource`   |
//! | [`builder`]     | `PopulationBuilder<S>` (incremental construction)         |
//! | [`error`]       | `AgentError`, `AgentResult<T>`                            |
//!
//! Membership is fixed once a `Population` exists: agents are never added or
//! removed, only their states change.  That is what makes `AgentId` a stable
//! scheduler key.

pub mod builder;
pub mod error;
pub mod population;


pub use builder::PopulationBuilder;
pub use error::{AgentError, AgentResult};
pub use population::{Population, PopulationSource};
