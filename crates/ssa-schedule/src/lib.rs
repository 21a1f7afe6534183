//! `ssa-schedule`: event queue and scheduler.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                 |
//! |-----------------|----------------------------------------------------------|
//! | [`event_queue`] | `EventQueue` (`BTreeMap<(SimTime, seq), AgentId>` + index) |
//! | [`scheduler`]   | `Scheduler<C, E>`, `Action<C, E>`, `Fired`               |
//! | [`error`]       | `ScheduleError`, `ScheduleResult<T>`                     |
//!
//! # Model (summary)
//!
//! Every agent has at most one pending action.  Scheduling an agent that
//! already has one replaces it in a single call:
//!
//! ```text
//! schedule(a, t1, f)   → queue: {a@t1}
//! schedule(a, t2, g)   → queue: {a@t2}      (f is dropped, never runs)
//! run_next(ctx)        → now = t2; g(ctx, scheduler)
//! ```
//!
//! Actions receive the scheduler itself, so they can arm further events.
//! Whatever they schedule is only seen by later `run_next` calls.
//!
//! # Cargo features
//!
//! | Feature   | Effect                                                  |
//! |-----------|---------------------------------------------------------|
//! | `fx-hash` | Uses `FxHashMap` for agent-keyed maps.                  |

pub mod error;
pub mod event_queue;
pub mod scheduler;


pub use error::{ScheduleError, ScheduleResult};
pub use event_queue::EventQueue;
pub use scheduler::{Action, Fired, Scheduler};

#[cfg(feature = "fx-hash")]
pub(crate) type AgentMap<V> = rustc_hash::FxHashMap<ssa_core::AgentId, V>;

#[cfg(not(feature = "fx-hash"))]
pub(crate) type AgentMap<V> = std::collections::HashMap<ssa_core::AgentId, V>;
