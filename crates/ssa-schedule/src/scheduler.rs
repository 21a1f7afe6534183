//! The `Scheduler`: an [`EventQueue`] plus the action each queued agent runs.

use std::fmt;

use ssa_core::{AgentId, SimTime};
use tracing::trace;

use crate::{AgentMap, EventQueue, ScheduleError, ScheduleResult};

/// A pending action.
///
/// Runs once, with exclusive access to the caller's context `C` and to the
/// scheduler that fired it.  `E` is the error type actions may fail with;
/// an error aborts the current `run_next`/`run_until` call and is returned
/// to its caller.
pub type Action<C, E> = Box<dyn FnOnce(&mut C, &mut Scheduler<C, E>) -> Result<(), E>>;

/// What a `run_next` call executed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Fired {
    pub agent: AgentId,
    /// The time the action was scheduled for.  `now` after the call is
    /// `max(previous now, time)`.
    pub time:  SimTime,
}

/// Time-ordered store of at most one pending action per agent.
///
/// # Invariants
///
/// - An agent has at most one pending action; `schedule` overwrites.
/// - The set of agents in `queue` equals the set of keys in `actions`.
/// - `now` never decreases.
pub struct Scheduler<C, E = ScheduleError> {
    queue:   EventQueue,
    actions: AgentMap<Action<C, E>>,
    now:     SimTime,
    fired:   u64,
}

impl<C, E> Default for Scheduler<C, E> {
    fn default() -> Self {
        Self::starting_at(SimTime::ZERO)
    }
}

impl<C, E> fmt::Debug for Scheduler<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("now", &self.now)
            .field("pending", &self.queue.len())
            .field("fired", &self.fired)
            .finish()
    }
}

impl<C, E> Scheduler<C, E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty scheduler whose clock starts at `now`.
    pub fn starting_at(now: SimTime) -> Self {
        Self {
            queue:   EventQueue::new(),
            actions: AgentMap::default(),
            now,
            fired:   0,
        }
    }

    // ── Inspection ────────────────────────────────────────────────────────

    #[inline]
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Number of pending actions (equals the number of armed agents).
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn is_scheduled(&self, agent: AgentId) -> bool {
        self.queue.contains(agent)
    }

    pub fn scheduled_time(&self, agent: AgentId) -> Option<SimTime> {
        self.queue.get(agent)
    }

    /// Time of the earliest pending action.
    pub fn next_time(&self) -> Option<SimTime> {
        self.queue.peek_min().map(|(_, t)| t)
    }

    /// Total actions executed since construction.
    pub fn fired_count(&self) -> u64 {
        self.fired
    }

    /// The underlying queue, in pop order.
    pub fn queue(&self) -> &EventQueue {
        &self.queue
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Arm `agent` to run `action` at `at`, replacing any pending action.
    ///
    /// `at` may lie before `now`; such an action fires on the next pop
    /// without moving the clock backwards.  Returns the replaced action's
    /// time, if any.
    pub fn schedule<F>(&mut self, agent: AgentId, at: SimTime, action: F) -> Option<SimTime>
    where
        F: FnOnce(&mut C, &mut Scheduler<C, E>) -> Result<(), E> + 'static,
    {
        let replaced = self.queue.insert(agent, at);
        self.actions.insert(agent, Box::new(action));
        trace!(%agent, %at, replaced = replaced.is_some(), "scheduled");
        replaced
    }

    /// Arm `agent` to run `action` after `delay` time units.
    ///
    /// Fails without touching the queue if `delay` is negative, NaN or
    /// infinite.  Returns the absolute time the action was scheduled for.
    pub fn schedule_in<F>(&mut self, agent: AgentId, delay: f64, action: F) -> ScheduleResult<SimTime>
    where
        F: FnOnce(&mut C, &mut Scheduler<C, E>) -> Result<(), E> + 'static,
    {
        if delay < 0.0 || !delay.is_finite() {
            return Err(ScheduleError::InvalidDelay { agent, delay });
        }
        let at = self.now.checked_add(delay)?;
        self.schedule(agent, at, action);
        Ok(at)
    }

    /// Drop `agent`'s pending action.  Returns `false` (and does nothing)
    /// when there was none.
    pub fn cancel(&mut self, agent: AgentId) -> bool {
        let removed = self.queue.remove(agent).is_some();
        self.actions.remove(&agent);
        if removed {
            trace!(%agent, "cancelled");
        }
        removed
    }

    /// Pop the earliest action, advance `now`, and run it.
    ///
    /// Returns `Ok(None)` without doing anything when the queue is empty.
    /// The queue entry and action record are removed before the action runs,
    /// so an action that re-arms its own agent creates a fresh entry.
    pub fn run_next(&mut self, ctx: &mut C) -> Result<Option<Fired>, E> {
        let Some((agent, time)) = self.queue.pop_min() else {
            return Ok(None);
        };
        if time > self.now {
            self.now = time;
        }
        self.fired += 1;
        trace!(%agent, %time, "firing");

        let action = self.actions.remove(&agent);
        debug_assert!(action.is_some(), "queued agent {agent} has no action");
        if let Some(action) = action {
            action(ctx, self)?;
        }
        Ok(Some(Fired { agent, time }))
    }

    /// Run every action scheduled at or before `horizon`, including ones
    /// armed along the way, then move `now` up to `horizon`.
    ///
    /// Equivalent to calling [`run_next`](Self::run_next) while
    /// `next_time() <= horizon`.  Returns how many actions ran.  A horizon
    /// before `now` runs only overdue actions and leaves `now` unchanged.
    pub fn run_until(&mut self, horizon: SimTime, ctx: &mut C) -> Result<usize, E> {
        let mut count = 0;
        while let Some(next) = self.next_time() {
            if next > horizon {
                break;
            }
            self.run_next(ctx)?;
            count += 1;
        }
        if horizon > self.now {
            self.now = horizon;
        }
        Ok(count)
    }
}
