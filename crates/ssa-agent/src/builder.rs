//! Incremental builder for a [`Population`].
//!
//! # Usage
//!
//! ```rust
//! use ssa_agent::PopulationBuilder;
//!
//! #[derive(Clone, Debug, PartialEq)]
//! enum Status { Idle, Busy }
//!
//! let mut b = PopulationBuilder::new();
//! let a = b.add_agent(Status::Idle);
//! let c = b.add_agent(Status::Busy);
//! b.connect(a, c);
//!
//! let population = b.build().unwrap();
//! assert_eq!(population.len(), 2);
//! assert_eq!(population.contacts(a), &[c]);
//! ```

use ssa_core::AgentId;

use crate::{AgentError, AgentResult, Population, PopulationSource};

/// Collects agent states and contact edges, then validates them in
/// [`build`](Self::build).
///
/// Edge endpoints are not checked until `build`, so agents and edges may be
/// added in any order.
pub struct PopulationBuilder<S> {
    states: Vec<S>,
    edges:  Vec<(AgentId, AgentId)>,
}

impl<S> Default for PopulationBuilder<S> {
    fn default() -> Self {
        Self { states: Vec::new(), edges: Vec::new() }
    }
}

impl<S> PopulationBuilder<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { states: Vec::with_capacity(capacity), edges: Vec::new() }
    }

    /// Append an agent and return its id.
    pub fn add_agent(&mut self, state: S) -> AgentId {
        let id = AgentId(self.states.len() as u32);
        self.states.push(state);
        id
    }

    /// Number of agents added so far.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Add `to` to the contacts of `from` only.
    pub fn connect_directed(&mut self, from: AgentId, to: AgentId) -> &mut Self {
        self.edges.push((from, to));
        self
    }

    /// Make `a` and `b` contacts of each other.
    pub fn connect(&mut self, a: AgentId, b: AgentId) -> &mut Self {
        self.edges.push((a, b));
        self.edges.push((b, a));
        self
    }

    /// Validate every edge and produce the population.
    pub fn build(self) -> AgentResult<Population<S>> {
        let mut contacts: Vec<Vec<AgentId>> = vec![Vec::new(); self.states.len()];
        for (from, to) in self.edges {
            contacts
                .get_mut(from.index())
                .ok_or(AgentError::UnknownAgent(from))?
                .push(to);
        }
        Population::new(self.states, contacts)
    }
}

impl<S> PopulationSource<S> for PopulationBuilder<S> {
    fn populate(self) -> AgentResult<Population<S>> {
        self.build()
    }
}
