//! `EventQueue`: keyed min-queue of agent wake-up times.
//!
//! # Structure
//!
//! Two maps kept in lockstep:
//!
//! - `order: BTreeMap<(SimTime, seq), AgentId>`: the priority order.
//! - `index: AgentMap<(SimTime, seq)>`: where each agent sits in `order`.
//!
//! `seq` is a per-queue insertion counter.  It makes every `order` key unique
//! and breaks ties between equal times in insertion order (FIFO).  An agent
//! that is re-inserted takes a fresh `seq`, so it goes to the back of its new
//! time slot.
//!
//! All operations are O(log n) in the number of queued agents.

use std::collections::BTreeMap;

use ssa_core::{AgentId, SimTime};

use crate::AgentMap;

/// A priority queue holding at most one entry per agent.
#[derive(Default, Debug, Clone)]
pub struct EventQueue {
    order:    BTreeMap<(SimTime, u64), AgentId>,
    index:    AgentMap<(SimTime, u64)>,
    next_seq: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `agent` at `time`, replacing any existing entry for it.
    ///
    /// Returns the replaced entry's time, if there was one.
    pub fn insert(&mut self, agent: AgentId, time: SimTime) -> Option<SimTime> {
        let previous = self.remove(agent);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.order.insert((time, seq), agent);
        self.index.insert(agent, (time, seq));
        previous
    }

    /// The earliest entry, without removing it.
    pub fn peek_min(&self) -> Option<(AgentId, SimTime)> {
        self.order
            .first_key_value()
            .map(|(&(time, _), &agent)| (agent, time))
    }

    /// Remove and return the earliest entry.
    pub fn pop_min(&mut self) -> Option<(AgentId, SimTime)> {
        let ((time, _), agent) = self.order.pop_first()?;
        self.index.remove(&agent);
        Some((agent, time))
    }

    /// Remove `agent`'s entry.  Absent agents are a no-op returning `None`.
    pub fn remove(&mut self, agent: AgentId) -> Option<SimTime> {
        let key = self.index.remove(&agent)?;
        self.order.remove(&key);
        Some(key.0)
    }

    /// The time `agent` is queued at, if any.
    pub fn get(&self, agent: AgentId) -> Option<SimTime> {
        self.index.get(&agent).map(|&(time, _)| time)
    }

    pub fn contains(&self, agent: AgentId) -> bool {
        self.index.contains_key(&agent)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Entries in pop order.
    pub fn iter(&self) -> impl Iterator<Item = (AgentId, SimTime)> + '_ {
        self.order.iter().map(|(&(time, _), &agent)| (agent, time))
    }
}
