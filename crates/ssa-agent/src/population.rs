//! `Population<S>`: agent states and the contact relation between them.
//!
//! Storage is two parallel `Vec`s indexed by `AgentId`:
//!
//! ```ignore
//! let s = population.state(agent);        // &S
//! let n = population.contacts(agent);     // &[AgentId]
//! ```
//!
//! Contacts are references by identity, not by owning pointer, so two
//! mutually-contacted agents never form an ownership cycle.

use ssa_core::AgentId;

use crate::{AgentError, AgentResult};

/// The agent population of one simulation.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Population<S> {
    states:   Vec<S>,
    contacts: Vec<Vec<AgentId>>,
}

impl<S> Population<S> {
    /// Build a population from per-agent states and contact lists.
    ///
    /// `contacts[i]` lists the contacts of `AgentId(i)`.  Every listed
    /// contact must exist and differ from its owner; duplicates are removed
    /// (first occurrence kept).
    pub fn new(states: Vec<S>, contacts: Vec<Vec<AgentId>>) -> AgentResult<Self> {
        if states.len() > u32::MAX as usize {
            return Err(AgentError::TooManyAgents(states.len()));
        }
        if contacts.len() != states.len() {
            return Err(AgentError::CountMismatch {
                expected: states.len(),
                got:      contacts.len(),
                what:     "contact lists",
            });
        }

        let n = states.len();
        let mut cleaned = Vec::with_capacity(n);
        for (i, list) in contacts.into_iter().enumerate() {
            let agent = AgentId(i as u32);
            let mut out: Vec<AgentId> = Vec::with_capacity(list.len());
            for contact in list {
                if contact == agent {
                    return Err(AgentError::SelfContact(agent));
                }
                if contact.index() >= n {
                    return Err(AgentError::UnknownContact { agent, contact });
                }
                if !out.contains(&contact) {
                    out.push(contact);
                }
            }
            cleaned.push(out);
        }

        Ok(Self { states, contacts: cleaned })
    }

    /// A population with no contacts at all.
    pub fn isolated(states: Vec<S>) -> AgentResult<Self> {
        let contacts = vec![Vec::new(); states.len()];
        Self::new(states, contacts)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    #[inline]
    pub fn contains(&self, agent: AgentId) -> bool {
        agent.index() < self.states.len()
    }

    /// Iterator over all `AgentId`s in ascending index order.
    pub fn ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        (0..self.states.len() as u32).map(AgentId)
    }

    /// State of `agent`.
    ///
    /// # Panics
    /// Panics if `agent` is not part of this population.
    #[inline]
    pub fn state(&self, agent: AgentId) -> &S {
        &self.states[agent.index()]
    }

    /// Mutable state of `agent`.
    ///
    /// # Panics
    /// Panics if `agent` is not part of this population.
    #[inline]
    pub fn state_mut(&mut self, agent: AgentId) -> &mut S {
        &mut self.states[agent.index()]
    }

    #[inline]
    pub fn get(&self, agent: AgentId) -> Option<&S> {
        self.states.get(agent.index())
    }

    /// Contacts of `agent`, in the order they were declared.
    ///
    /// # Panics
    /// Panics if `agent` is not part of this population.
    #[inline]
    pub fn contacts(&self, agent: AgentId) -> &[AgentId] {
        &self.contacts[agent.index()]
    }

    /// All states, indexed by `AgentId`.
    pub fn states(&self) -> &[S] {
        &self.states
    }

    /// Number of agents whose state satisfies `pred`.
    pub fn count_where(&self, pred: impl Fn(&S) -> bool) -> usize {
        self.states.iter().filter(|s| pred(s)).count()
    }
}

// ── PopulationSource ──────────────────────────────────────────────────────────

/// Anything that can produce the initial population of a run.
///
/// Topology generators (grids, random geometric graphs, CSV loaders, …) live
/// in application code and implement this trait; the engine only consumes the
/// finished `Population`.
pub trait PopulationSource<S> {
    fn populate(self) -> AgentResult<Population<S>>;
}

impl<S> PopulationSource<S> for Population<S> {
    fn populate(self) -> AgentResult<Population<S>> {
        Ok(self)
    }
}
