//! `ssa-process`: declare transitions once, run them as competing clocks.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                        |
//! |----------------|-----------------------------------------------------------------|
//! | [`transition`] | `Transition<S>` declarations, `ClockKind`                       |
//! | [`builder`]    | `ProcessBuilder<S>`, validates and compiles a model              |
//! | [`process`]    | `Process<S>` runtime: rates, sampling, firing, re-arming        |
//! | [`sampling`]   | Pure competing-clocks helpers (`waiting_time`, `select`)        |
//! | [`context`]    | `World<S, R>`, `Ego<'a, S>`, `ActionContext<'a, S>`             |
//! | [`event`]      | `TransitionEvent` records                                       |
//! | [`registry`]   | `ModelRegistry<S>`, models keyed by name                         |
//! | [`error`]      | `ProcessError`, `ProcessResult<T>`                              |
//!
//! # How a model runs
//!
//! A model is an ordered list of `(rate, guard, action)` transitions.  To arm
//! an agent the runtime:
//!
//! 1. evaluates every rate, zeroing those whose guard is false;
//! 2. if the total is zero, leaves the agent dormant (cancelling anything
//!    it had pending);
//! 3. otherwise draws `wait ~ Exp(total)` and a winner with probability
//!    `rate / total`, scanning in declaration order;
//! 4. schedules the winner to fire after `wait`.
//!
//! Firing runs the winner's action, which returns every agent whose rates it
//! may have changed.  Each of those is re-armed through the same four steps.
//!
//! ```rust,ignore
//! let sir = ProcessBuilder::new("sir")
//!     .transition(Transition::poisson(
//!         "recover",
//!         |_| 0.1,
//!         |ego| *ego.state() == Status::Infected,
//!         |ctx| { *ctx.state_mut() = Status::Recovered; vec![ctx.agent()] },
//!     ))
//!     .build()?;
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod event;
pub mod process;
pub mod registry;
pub mod sampling;
pub mod transition;

#[cfg(test)]
mod tests;

pub use builder::ProcessBuilder;
pub use context::{ActionContext, Ego, World};
pub use error::{ProcessError, ProcessResult};
pub use event::TransitionEvent;
pub use process::{Armed, Process, ProcessScheduler};
pub use registry::ModelRegistry;
pub use transition::{Affected, ClockKind, Transition};
