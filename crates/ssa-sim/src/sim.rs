//! The `Sim` struct and its event loop.

use std::rc::Rc;

use ssa_agent::Population;
use ssa_core::{AgentId, SimConfig, SimRng, SimTime, UniformSource};
use ssa_process::{Armed, Process, ProcessScheduler, TransitionEvent, World};
use ssa_schedule::Fired;
use tracing::{error, info};

use crate::{SimObserver, SimResult};

/// The main simulation runner.
///
/// `Sim<S, R>` owns the agents, the random source and the scheduler, and
/// runs one model over them:
///
/// 1. **Spawn**: every agent is armed once, in ascending id order.  Happens
///    on the first `step`/`run_until`/`run`, or explicitly via
///    [`spawn_all`](Self::spawn_all).
/// 2. **Loop**: pop the earliest pending transition, apply it, re-arm the
///    agents it reports as affected.  Repeat until the next event lies past
///    the horizon or nothing is pending.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<S, R = SimRng> {
    pub(crate) config:    SimConfig,
    pub(crate) end_time:  SimTime,
    pub(crate) process:   Rc<Process<S>>,
    pub(crate) world:     World<S, R>,
    pub(crate) scheduler: ProcessScheduler<S, R>,
    pub(crate) spawned:   bool,
}

impl<S: 'static, R: UniformSource + 'static> Sim<S, R> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Arm every agent.  Only the first call does anything; it returns how
    /// many agents ended up with a pending transition.
    pub fn spawn_all(&mut self) -> SimResult<usize> {
        if self.spawned {
            return Ok(self.scheduler.len());
        }
        self.spawned = true;
        let scheduled = self
            .process
            .spawn_all(&mut self.world, &mut self.scheduler)
            .inspect_err(|e| error!(model = self.process.name(), error = %e, "spawn failed"))?;
        info!(
            model = self.process.name(),
            agents = self.world.population.len(),
            scheduled,
            "agents spawned"
        );
        Ok(scheduled)
    }

    /// Fire the single earliest pending transition, whatever its time.
    ///
    /// Returns `None` once nothing is pending.  Ignores `end_time`.  When
    /// `record_events` is on, the event is kept until
    /// [`drain_events`](Self::drain_events) is called.
    pub fn step(&mut self) -> SimResult<Option<Fired>> {
        self.spawn_all()?;
        let fired = self
            .scheduler
            .run_next(&mut self.world)
            .inspect_err(|e| error!(now = %self.scheduler.now(), error = %e, "transition failed"))?;
        Ok(fired)
    }

    /// Fire every transition due at or before `horizon`, then move the clock
    /// to `horizon`.  Returns how many fired.
    ///
    /// With `record_events` on, every firing is appended to the event log and
    /// stays there until [`drain_events`](Self::drain_events); callers running
    /// long batches must drain between calls or turn recording off.
    pub fn run_until(&mut self, horizon: f64) -> SimResult<usize> {
        let horizon = SimTime::new(horizon)?;
        self.spawn_all()?;
        let fired = self
            .scheduler
            .run_until(horizon, &mut self.world)
            .inspect_err(|e| error!(now = %self.scheduler.now(), error = %e, "transition failed"))?;
        Ok(fired)
    }

    /// Run from the current time to `config.end_time`, reporting to
    /// `observer`.  Returns how many transitions fired during this call.
    pub fn run<O: SimObserver<S> + ?Sized>(&mut self, observer: &mut O) -> SimResult<u64> {
        self.spawn_all()?;
        info!(
            model = self.process.name(),
            agents = self.world.population.len(),
            start = %self.scheduler.now(),
            end = %self.end_time,
            "simulation started"
        );
        observer.on_start(self.scheduler.now(), &self.world.population);

        // Events left over from earlier `step`/`run_until` calls are not
        // reported here.
        self.world.drain_events();

        let mut fired = 0u64;
        while self.scheduler.next_time().is_some_and(|t| t <= self.end_time) {
            self.step()?;
            fired += 1;
            let events: Vec<TransitionEvent> = self.world.drain_events().collect();
            for event in &events {
                observer.on_event(event, &self.world.population);
            }
        }
        // Nothing is due before the horizon any more; this only moves the clock.
        self.run_until(self.end_time.as_f64())?;

        info!(
            model = self.process.name(),
            fired,
            pending = self.scheduler.len(),
            now = %self.scheduler.now(),
            "simulation finished"
        );
        observer.on_sim_end(self.scheduler.now(), &self.world.population);
        Ok(fired)
    }

    /// Re-arm `agent` from outside the event loop, e.g. after changing its
    /// state through [`population_mut`](Self::population_mut).
    ///
    /// Goes through the same path as a re-arm after a transition: a pending
    /// transition is replaced, and an agent with no possible transition
    /// stays (or becomes) dormant.
    pub fn reactivate(&mut self, agent: AgentId) -> SimResult<Armed> {
        let armed = self.process.arm(agent, &mut self.world, &mut self.scheduler)?;
        Ok(armed)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn now(&self) -> SimTime {
        self.scheduler.now()
    }

    pub fn end_time(&self) -> SimTime {
        self.end_time
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn process(&self) -> &Rc<Process<S>> {
        &self.process
    }

    pub fn population(&self) -> &Population<S> {
        &self.world.population
    }

    /// Mutable access to agent states.  Changes are not seen by the
    /// scheduler until the agent is re-armed; see [`reactivate`](Self::reactivate).
    pub fn population_mut(&mut self) -> &mut Population<S> {
        &mut self.world.population
    }

    /// Recorded events not yet consumed by [`run`](Self::run) or
    /// [`drain_events`](Self::drain_events).
    pub fn events(&self) -> &[TransitionEvent] {
        self.world.events()
    }

    pub fn drain_events(&mut self) -> Vec<TransitionEvent> {
        self.world.drain_events().collect()
    }

    /// Time of the earliest pending transition.
    pub fn next_time(&self) -> Option<SimTime> {
        self.scheduler.next_time()
    }

    /// Number of agents with a pending transition.
    pub fn pending(&self) -> usize {
        self.scheduler.len()
    }

    pub fn is_scheduled(&self, agent: AgentId) -> bool {
        self.scheduler.is_scheduled(agent)
    }

    /// Total transitions fired since the sim was built.
    pub fn fired_count(&self) -> u64 {
        self.scheduler.fired_count()
    }

    pub fn rng(&mut self) -> &mut R {
        &mut self.world.rng
    }
}
