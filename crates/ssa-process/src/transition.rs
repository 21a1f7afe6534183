//! Transition declarations.
//!
//! A transition is a `(rate, guard, action)` triple plus a label:
//!
//! - `rate(&Ego) -> f64`: non-negative; evaluated for every arm, used only
//!   when the guard holds.
//! - `guard(&Ego) -> bool`: whether the transition is currently possible.
//! - `action(&mut ActionContext) -> Affected`: applies the transition and
//!   returns every agent whose rates it may have changed.
//!
//! The affected set is what keeps the per-agent scheme correct: an agent
//! whose guard or rate depends on a neighbour is only re-armed when some
//! action names it.  It normally includes the acting agent itself.

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use ssa_core::AgentId;

use crate::{ActionContext, Ego, ProcessError, ProcessResult};

/// Agents to re-arm after a transition fires.
pub type Affected = Vec<AgentId>;

pub(crate) type RateFn<S> = Box<dyn Fn(&Ego<'_, S>) -> f64>;
pub(crate) type GuardFn<S> = Box<dyn Fn(&Ego<'_, S>) -> bool>;
pub(crate) type ActionFn<S> = Box<dyn Fn(&mut ActionContext<'_, S>) -> Affected>;

// ── ClockKind ─────────────────────────────────────────────────────────────────

/// Distribution of a transition's waiting time.
///
/// Only memoryless clocks are implemented: they are what lets competing
/// transitions be merged into a single `Exp(total)` draw.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ClockKind {
    /// Exponentially distributed waiting time (a Poisson process).
    #[default]
    Exponential,
}

impl FromStr for ClockKind {
    type Err = ProcessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exponential" | "exp" | "poisson" => Ok(ClockKind::Exponential),
            _ => Err(ProcessError::UnsupportedClock(s.to_string())),
        }
    }
}

impl fmt::Display for ClockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClockKind::Exponential => f.write_str("exponential"),
        }
    }
}

// ── Transition ────────────────────────────────────────────────────────────────

/// A transition under declaration.  Completed and checked by
/// [`ProcessBuilder::build`](crate::ProcessBuilder::build).
pub struct Transition<S> {
    label:  String,
    clock:  ClockKind,
    rate:   Option<RateFn<S>>,
    guard:  Option<GuardFn<S>>,
    action: Option<ActionFn<S>>,
}

impl<S> fmt::Debug for Transition<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("label", &self.label)
            .field("clock", &self.clock)
            .field("rate", &self.rate.is_some())
            .field("guard", &self.guard.is_some())
            .field("action", &self.action.is_some())
            .finish()
    }
}

impl<S: 'static> Transition<S> {
    /// Start declaring a transition.  Rate, guard and action must all be set
    /// before the model is built.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label:  label.into(),
            clock:  ClockKind::Exponential,
            rate:   None,
            guard:  None,
            action: None,
        }
    }

    /// Shorthand for a fully specified exponential transition.
    pub fn poisson(
        label:  impl Into<String>,
        rate:   impl Fn(&Ego<'_, S>) -> f64 + 'static,
        guard:  impl Fn(&Ego<'_, S>) -> bool + 'static,
        action: impl Fn(&mut ActionContext<'_, S>) -> Affected + 'static,
    ) -> Self {
        Self::new(label).rate(rate).when(guard).then(action)
    }

    pub fn rate(mut self, rate: impl Fn(&Ego<'_, S>) -> f64 + 'static) -> Self {
        self.rate = Some(Box::new(rate));
        self
    }

    /// A rate that does not depend on the agent.
    pub fn constant_rate(self, rate: f64) -> Self {
        self.rate(move |_| rate)
    }

    pub fn when(mut self, guard: impl Fn(&Ego<'_, S>) -> bool + 'static) -> Self {
        self.guard = Some(Box::new(guard));
        self
    }

    /// Guard that always holds.
    pub fn always(self) -> Self {
        self.when(|_| true)
    }

    pub fn then(mut self, action: impl Fn(&mut ActionContext<'_, S>) -> Affected + 'static) -> Self {
        self.action = Some(Box::new(action));
        self
    }

    pub fn clock(mut self, clock: ClockKind) -> Self {
        self.clock = clock;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Check completeness and freeze the declaration.
    pub(crate) fn compile(self, model: &str) -> ProcessResult<CompiledTransition<S>> {
        let Self { label, clock, rate, guard, action } = self;

        let Some(rate) = rate else {
            return Err(ProcessError::MissingRate { model: model.to_string(), transition: label });
        };
        let Some(guard) = guard else {
            return Err(ProcessError::MissingGuard { model: model.to_string(), transition: label });
        };
        let Some(action) = action else {
            return Err(ProcessError::MissingAction { model: model.to_string(), transition: label });
        };

        Ok(CompiledTransition {
            label: Rc::from(label),
            clock,
            rate,
            guard,
            action,
        })
    }
}

/// A validated transition inside a compiled [`Process`](crate::Process).
pub(crate) struct CompiledTransition<S> {
    pub(crate) label:  Rc<str>,
    pub(crate) clock:  ClockKind,
    pub(crate) rate:   RateFn<S>,
    pub(crate) guard:  GuardFn<S>,
    pub(crate) action: ActionFn<S>,
}
