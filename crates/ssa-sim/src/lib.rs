//! `ssa-sim`: event-loop driver for the `rust_ssa` engine.
//!
//! # Run loop
//!
//! ```text
//! spawn:  for agent in 0..n (ascending id):  process.arm(agent)
//! loop:   while next_time() <= end_time:
//!           pop earliest (agent, t); now = max(now, t)
//!           run the winning transition's action → affected set
//!           re-arm each affected agent once, in the order returned
//!           report recorded events to the observer
//! end:    now = max(now, end_time)
//! ```
//!
//! Agents whose every guard is false are dormant: they hold no pending
//! transition and cost nothing until some neighbour's action names them.
//!
//! # Cargo features
//!
//! | Feature   | Effect                                                  |
//! |-----------|---------------------------------------------------------|
//! | `fx-hash` | FxHash for the scheduler's agent-keyed maps.            |
//! | `serde`   | Serde derives on `SimConfig` and the id types.          |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ssa_core::SimConfig;
//! use ssa_sim::{EventCounter, SimBuilder};
//!
//! let mut sim = SimBuilder::new(config, population)
//!     .model(registry, "sir")
//!     .build()?;
//! let mut counter = EventCounter::new();
//! sim.run(&mut counter)?;
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{EventCounter, NoopObserver, SimObserver};
pub use sim::Sim;
