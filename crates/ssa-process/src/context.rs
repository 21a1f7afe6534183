//! State handed to scheduled actions and to transition closures.
//!
//! - [`World`] is the scheduler context: everything an action may touch.
//! - [`Ego`] is the read-only view rate and guard closures see.
//! - [`ActionContext`] is the mutable view an action closure sees.
//!
//! The random source travels inside `World` and is lent to actions as
//! `&mut dyn UniformSource`, so every draw of a run comes from one explicit
//! stream.

use ssa_agent::Population;
use ssa_core::{AgentId, SimRng, SimTime, UniformSource};

use crate::TransitionEvent;

// ── World ─────────────────────────────────────────────────────────────────────

/// The mutable state of a simulation, passed to every scheduled action.
pub struct World<S, R = SimRng> {
    pub population: Population<S>,
    pub rng:        R,
    record_events:  bool,
    events:         Vec<TransitionEvent>,
}

impl<S, R: UniformSource> World<S, R> {
    /// A world that records a [`TransitionEvent`] for every firing.
    pub fn new(population: Population<S>, rng: R) -> Self {
        Self {
            population,
            rng,
            record_events: true,
            events: Vec::new(),
        }
    }

    pub fn with_recording(mut self, record_events: bool) -> Self {
        self.record_events = record_events;
        self
    }

    pub fn is_recording(&self) -> bool {
        self.record_events
    }

    pub(crate) fn record(&mut self, event: impl FnOnce() -> TransitionEvent) {
        if self.record_events {
            self.events.push(event());
        }
    }

    /// Events recorded since the last drain, oldest first.
    pub fn events(&self) -> &[TransitionEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> std::vec::Drain<'_, TransitionEvent> {
        self.events.drain(..)
    }
}

// ── Ego ───────────────────────────────────────────────────────────────────────

/// Read-only view of one agent and its surroundings, given to rate and
/// guard closures.
pub struct Ego<'a, S> {
    id:         AgentId,
    population: &'a Population<S>,
}

impl<'a, S> Ego<'a, S> {
    #[inline]
    pub fn new(id: AgentId, population: &'a Population<S>) -> Self {
        Self { id, population }
    }

    #[inline]
    pub fn id(&self) -> AgentId {
        self.id
    }

    #[inline]
    pub fn state(&self) -> &'a S {
        self.population.state(self.id)
    }

    #[inline]
    pub fn contacts(&self) -> &'a [AgentId] {
        self.population.contacts(self.id)
    }

    /// States of this agent's contacts, in contact order.
    pub fn contact_states(&self) -> impl Iterator<Item = &'a S> + 'a {
        let population = self.population;
        self.contacts().iter().map(move |&c| population.state(c))
    }

    /// Number of contacts whose state satisfies `pred`.
    pub fn count_contacts(&self, pred: impl Fn(&S) -> bool) -> usize {
        self.contact_states().filter(|s| pred(s)).count()
    }

    pub fn population(&self) -> &'a Population<S> {
        self.population
    }
}

// ── ActionContext ─────────────────────────────────────────────────────────────

/// Mutable access given to an action closure while its transition fires.
pub struct ActionContext<'a, S> {
    agent:      AgentId,
    now:        SimTime,
    population: &'a mut Population<S>,
    rng:        &'a mut dyn UniformSource,
}

impl<'a, S> ActionContext<'a, S> {
    pub fn new(
        agent:      AgentId,
        now:        SimTime,
        population: &'a mut Population<S>,
        rng:        &'a mut dyn UniformSource,
    ) -> Self {
        Self { agent, now, population, rng }
    }

    /// The agent whose transition is firing.
    #[inline]
    pub fn agent(&self) -> AgentId {
        self.agent
    }

    #[inline]
    pub fn now(&self) -> SimTime {
        self.now
    }

    #[inline]
    pub fn state(&self) -> &S {
        self.population.state(self.agent)
    }

    #[inline]
    pub fn state_mut(&mut self) -> &mut S {
        self.population.state_mut(self.agent)
    }

    #[inline]
    pub fn contacts(&self) -> &[AgentId] {
        self.population.contacts(self.agent)
    }

    pub fn population(&self) -> &Population<S> {
        &*self.population
    }

    pub fn population_mut(&mut self) -> &mut Population<S> {
        &mut *self.population
    }

    /// The run's random source.  Draws taken here advance the same stream
    /// the runtime samples waiting times from.
    pub fn rng(&mut self) -> &mut dyn UniformSource {
        &mut *self.rng
    }

    /// A uniformly chosen contact, or `None` for an isolated agent.
    pub fn random_contact(&mut self) -> Option<AgentId> {
        let contacts = self.population.contacts(self.agent);
        let i = self.rng.index(contacts.len())?;
        Some(contacts[i])
    }

    /// This agent followed by all of its contacts: the usual affected set of
    /// a transition that changes only this agent's state.
    pub fn self_and_contacts(&self) -> Vec<AgentId> {
        let contacts = self.contacts();
        let mut out = Vec::with_capacity(contacts.len() + 1);
        out.push(self.agent);
        out.extend_from_slice(contacts);
        out
    }
}
