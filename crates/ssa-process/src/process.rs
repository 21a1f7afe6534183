//! The compiled per-model runtime.

use std::fmt;
use std::rc::Rc;

use ssa_agent::Population;
use ssa_core::{AgentId, SimRng, SimTime, TransitionId, UniformSource};
use ssa_schedule::Scheduler;
use tracing::{debug, error, trace};

use crate::sampling;
use crate::transition::{ClockKind, CompiledTransition};
use crate::{ActionContext, Ego, ProcessError, ProcessResult, TransitionEvent, World};

/// The scheduler type a process arms agents on.
pub type ProcessScheduler<S, R = SimRng> = Scheduler<World<S, R>, ProcessError>;

/// Outcome of arming one agent.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Armed {
    /// The agent will fire `transition` at `at` unless re-armed first.
    Scheduled { at: SimTime, transition: TransitionId },
    /// Every guard is false (or every active rate is zero); nothing pending.
    Dormant,
}

/// A compiled model: an ordered, closed list of transitions shared by all
/// agents of one type.
///
/// Built by [`ProcessBuilder`](crate::ProcessBuilder) and handed out as
/// `Rc<Process<S>>`; every scheduled firing holds a clone of that `Rc`.
pub struct Process<S> {
    name:        Rc<str>,
    transitions: Vec<CompiledTransition<S>>,
}

impl<S> fmt::Debug for Process<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Process")
            .field("name", &self.name)
            .field(
                "transitions",
                &self.transitions.iter().map(|t| (&*t.label, t.clock)).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<S> Process<S> {
    pub(crate) fn new(name: Rc<str>, transitions: Vec<CompiledTransition<S>>) -> Self {
        Self { name, transitions }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of transitions.
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Transition labels in declaration order.
    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.transitions.iter().map(|t| &*t.label)
    }

    pub fn label(&self, transition: TransitionId) -> Option<&str> {
        self.transitions.get(transition.index()).map(|t| &*t.label)
    }

    /// Declared waiting-time distribution of `transition`.
    pub fn clock(&self, transition: TransitionId) -> Option<ClockKind> {
        self.transitions.get(transition.index()).map(|t| t.clock)
    }

    /// Id of the first transition labelled `label`.
    pub fn transition_id(&self, label: &str) -> Option<TransitionId> {
        self.transitions
            .iter()
            .position(|t| &*t.label == label)
            .map(|i| TransitionId(i as u16))
    }

    /// Instantaneous rate of every transition for `agent`, zero where the
    /// guard is false.
    ///
    /// Each rate closure runs even when its guard is false.  An active rate
    /// that is negative, NaN or infinite is an error.
    pub fn rates(&self, agent: AgentId, population: &Population<S>) -> ProcessResult<Vec<f64>> {
        let ego = Ego::new(agent, population);
        self.transitions
            .iter()
            .map(|t| {
                let rate = (t.rate)(&ego);
                if !(t.guard)(&ego) {
                    return Ok(0.0);
                }
                if rate.is_finite() && rate >= 0.0 {
                    Ok(rate)
                } else {
                    error!(model = %self.name, %agent, transition = %t.label, rate, "invalid rate");
                    Err(ProcessError::InvalidRate {
                        model:      self.name.to_string(),
                        agent,
                        transition: t.label.to_string(),
                        rate,
                    })
                }
            })
            .collect()
    }
}

impl<S: 'static> Process<S> {
    /// Arm an agent for the first time.  Same as [`arm`](Self::arm).
    pub fn spawn<R>(
        self: &Rc<Self>,
        agent:     AgentId,
        world:     &mut World<S, R>,
        scheduler: &mut ProcessScheduler<S, R>,
    ) -> ProcessResult<Armed>
    where
        R: UniformSource + 'static,
    {
        self.arm(agent, world, scheduler)
    }

    /// Spawn every agent of the population in ascending id order.
    ///
    /// Returns how many ended up scheduled (the rest are dormant).
    pub fn spawn_all<R>(
        self: &Rc<Self>,
        world:     &mut World<S, R>,
        scheduler: &mut ProcessScheduler<S, R>,
    ) -> ProcessResult<usize>
    where
        R: UniformSource + 'static,
    {
        let ids: Vec<AgentId> = world.population.ids().collect();
        let mut scheduled = 0;
        for agent in ids {
            if let Armed::Scheduled { .. } = self.arm(agent, world, scheduler)? {
                scheduled += 1;
            }
        }
        Ok(scheduled)
    }

    /// Recompute `agent`'s rates and schedule its next transition, replacing
    /// whatever it had pending.
    ///
    /// Draws exactly two uniforms from `world.rng` when the total rate is
    /// positive (waiting time, then winner) and none when it is zero.  A
    /// zero-total agent goes dormant: any pending action is cancelled and
    /// nothing is scheduled.
    ///
    /// On any error the agent is left with nothing pending.
    pub fn arm<R>(
        self: &Rc<Self>,
        agent:     AgentId,
        world:     &mut World<S, R>,
        scheduler: &mut ProcessScheduler<S, R>,
    ) -> ProcessResult<Armed>
    where
        R: UniformSource + 'static,
    {
        if !world.population.contains(agent) {
            return Err(ProcessError::UnknownAgent { model: self.name.to_string(), agent });
        }
        let armed = self.try_arm(agent, world, scheduler);
        if armed.is_err() && scheduler.cancel(agent) {
            debug!(model = %self.name, %agent, "stale action cancelled after failed arm");
        }
        armed
    }

    fn try_arm<R>(
        self: &Rc<Self>,
        agent:     AgentId,
        world:     &mut World<S, R>,
        scheduler: &mut ProcessScheduler<S, R>,
    ) -> ProcessResult<Armed>
    where
        R: UniformSource + 'static,
    {
        let rates = self.rates(agent, &world.population)?;
        let total: f64 = rates.iter().sum();

        if total == 0.0 {
            let cancelled = scheduler.cancel(agent);
            debug!(model = %self.name, %agent, cancelled, "dormant");
            return Ok(Armed::Dormant);
        }
        if !total.is_finite() {
            error!(model = %self.name, %agent, ?rates, "total rate overflow");
            return Err(ProcessError::RateOverflow { model: self.name.to_string(), agent });
        }

        let wait = sampling::waiting_time(total, world.rng.next_uniform());
        let draw = world.rng.next_uniform();
        let Some(winner) = sampling::select(&rates, total, draw) else {
            error!(model = %self.name, %agent, draw, total, ?rates, "no transition selected");
            return Err(ProcessError::SelectionExhausted {
                model: self.name.to_string(),
                agent,
                rates,
                total,
                draw,
            });
        };
        let transition = TransitionId(winner as u16);

        let process = Rc::clone(self);
        let at = scheduler.schedule_in(
            agent,
            wait,
            move |world: &mut World<S, R>, scheduler: &mut ProcessScheduler<S, R>| {
                process.fire(agent, transition, world, scheduler)
            },
        )?;
        debug!(
            model = %self.name,
            %agent,
            total,
            wait,
            transition = %self.transitions[winner].label,
            "armed"
        );
        Ok(Armed::Scheduled { at, transition })
    }

    /// Apply `transition` to `agent`, then re-arm every agent its action
    /// reports as affected (each once, in the order reported).
    ///
    /// A failed re-arm does not stop the others; the first error is returned
    /// once every affected agent has been handled.
    fn fire<R>(
        self: &Rc<Self>,
        agent:      AgentId,
        transition: TransitionId,
        world:      &mut World<S, R>,
        scheduler:  &mut ProcessScheduler<S, R>,
    ) -> ProcessResult<()>
    where
        R: UniformSource + 'static,
    {
        let compiled = &self.transitions[transition.index()];
        let now = scheduler.now();

        let affected = {
            let mut ctx = ActionContext::new(agent, now, &mut world.population, &mut world.rng);
            (compiled.action)(&mut ctx)
        };
        trace!(model = %self.name, %agent, transition = %compiled.label, affected = affected.len(), "fired");

        world.record(|| TransitionEvent {
            time:  now,
            agent,
            model: Rc::clone(&self.name),
            transition,
            label: Rc::clone(&compiled.label),
        });

        let mut rearmed: Vec<AgentId> = Vec::with_capacity(affected.len());
        let mut first_error = None;
        for other in affected {
            if rearmed.contains(&other) {
                continue;
            }
            rearmed.push(other);
            if let Err(e) = self.arm(other, world, scheduler) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}
