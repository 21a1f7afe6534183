//! Unit tests for ssa-process.

use std::rc::Rc;

use ssa_agent::{Population, PopulationBuilder};
use ssa_core::{AgentId, ScriptedUniform, SimRng, SimTime, TransitionId};

use crate::sampling::{select, waiting_time};
use crate::{
    Armed, ClockKind, ModelRegistry, Process, ProcessBuilder, ProcessError, ProcessScheduler,
    Transition, World,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Status {
    Susceptible,
    Infected,
    Recovered,
}

use Status::*;

/// Susceptible agents catch the infection at rate `beta × infected contacts`;
/// infected agents recover at rate `gamma`.
fn sir(beta: f64, gamma: f64) -> Rc<Process<Status>> {
    ProcessBuilder::<Status>::new("sir")
        .transition(Transition::poisson(
            "infect",
            move |ego| beta * ego.count_contacts(|s| *s == Infected) as f64,
            |ego| *ego.state() == Susceptible,
            |ctx| {
                *ctx.state_mut() = Infected;
                ctx.self_and_contacts()
            },
        ))
        .transition(Transition::poisson(
            "recover",
            move |_| gamma,
            |ego| *ego.state() == Infected,
            |ctx| {
                *ctx.state_mut() = Recovered;
                ctx.self_and_contacts()
            },
        ))
        .build()
        .unwrap()
}

/// A chain `0 - 1 - ... - n-1` with the given states.
fn chain(states: &[Status]) -> Population<Status> {
    let mut b = PopulationBuilder::new();
    let ids: Vec<AgentId> = states.iter().map(|&s| b.add_agent(s)).collect();
    for pair in ids.windows(2) {
        b.connect(pair[0], pair[1]);
    }
    b.build().unwrap()
}

/// `active` agents fire once at rate 1 and become inactive.
fn decay() -> Rc<Process<bool>> {
    ProcessBuilder::<bool>::new("decay")
        .transition(Transition::<bool>::new("decay").constant_rate(1.0).when(|ego| *ego.state()).then(|ctx| {
            *ctx.state_mut() = false;
            vec![ctx.agent()]
        }))
        .build()
        .unwrap()
}

/// Two active agents in mutual contact.
fn pair() -> Population<bool> {
    let mut b = PopulationBuilder::new();
    let a = b.add_agent(true);
    let c = b.add_agent(true);
    b.connect(a, c);
    b.build().unwrap()
}

fn scheduler<S, R>() -> ProcessScheduler<S, R> {
    ProcessScheduler::<S, R>::new()
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn builds_in_declaration_order() {
        let model = sir(1.0, 1.0);
        assert_eq!(model.name(), "sir");
        assert_eq!(model.len(), 2);
        assert_eq!(model.labels().collect::<Vec<_>>(), vec!["infect", "recover"]);
        assert_eq!(model.transition_id("recover"), Some(TransitionId(1)));
        assert_eq!(model.label(TransitionId(0)), Some("infect"));
        assert_eq!(model.transition_id("vanish"), None);
    }

    #[test]
    fn blank_name_rejected() {
        let err = ProcessBuilder::<bool>::new("  ")
            .transition(Transition::<bool>::new("t").constant_rate(1.0).always().then(|_| vec![]))
            .build()
            .unwrap_err();
        assert_eq!(err, ProcessError::EmptyModelName);
    }

    #[test]
    fn model_without_transitions_rejected() {
        let err = ProcessBuilder::<bool>::new("empty").build().unwrap_err();
        assert_eq!(err, ProcessError::EmptyModel { model: "empty".into() });
    }

    #[test]
    fn incomplete_transitions_rejected() {
        let err = ProcessBuilder::<bool>::new("m")
            .transition(Transition::<bool>::new("no_rate").always().then(|_| vec![]))
            .build()
            .unwrap_err();
        assert_eq!(err, ProcessError::MissingRate { model: "m".into(), transition: "no_rate".into() });

        let err = ProcessBuilder::<bool>::new("m")
            .transition(Transition::<bool>::new("no_guard").constant_rate(1.0).then(|_| vec![]))
            .build()
            .unwrap_err();
        assert_eq!(err, ProcessError::MissingGuard { model: "m".into(), transition: "no_guard".into() });

        let err = ProcessBuilder::<bool>::new("m")
            .transition(Transition::<bool>::new("no_action").constant_rate(1.0).always())
            .build()
            .unwrap_err();
        assert_eq!(err, ProcessError::MissingAction { model: "m".into(), transition: "no_action".into() });
    }

    #[test]
    fn clock_kind_parsing() {
        assert_eq!("exponential".parse::<ClockKind>().unwrap(), ClockKind::Exponential);
        assert_eq!(" Poisson ".parse::<ClockKind>().unwrap(), ClockKind::Exponential);
        assert_eq!("exp".parse::<ClockKind>().unwrap(), ClockKind::Exponential);
        assert_eq!(
            "fixed".parse::<ClockKind>().unwrap_err(),
            ProcessError::UnsupportedClock("fixed".into())
        );
        assert_eq!(ClockKind::default().to_string(), "exponential");
    }

    #[test]
    fn declared_clock_kept_after_build() {
        let clock: ClockKind = "poisson".parse().unwrap();
        let model = ProcessBuilder::<bool>::new("clocked")
            .transition(Transition::<bool>::new("t").constant_rate(1.0).always().clock(clock).then(|_| vec![]))
            .build()
            .unwrap();
        assert_eq!(model.clock(TransitionId(0)), Some(ClockKind::Exponential));
        assert_eq!(model.clock(TransitionId(1)), None);
        assert!(format!("{model:?}").contains("Exponential"));
    }
}

// ── Sampling ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod sampling_tests {
    use super::*;

    #[test]
    fn waiting_time_is_inverse_cdf() {
        assert_eq!(waiting_time(2.0, 0.0), 0.0);
        let w = waiting_time(4.0, 0.5);
        assert!((w - std::f64::consts::LN_2 / 4.0).abs() < 1e-12);
    }

    #[test]
    fn select_scans_in_order() {
        let rates = [1.0, 2.0, 1.0];
        assert_eq!(select(&rates, 4.0, 0.0), Some(0));
        assert_eq!(select(&rates, 4.0, 0.24), Some(0));
        assert_eq!(select(&rates, 4.0, 0.25), Some(1));
        assert_eq!(select(&rates, 4.0, 0.74), Some(1));
        assert_eq!(select(&rates, 4.0, 0.99), Some(2));
    }

    #[test]
    fn zero_rates_never_win() {
        // Residual lands exactly on the boundary before the zero-rate entry.
        let rates = [1.0, 0.0, 3.0];
        assert_eq!(select(&rates, 4.0, 0.25), Some(2));
        assert_eq!(select(&[0.0, 5.0], 5.0, 0.0), Some(1));
    }

    #[test]
    fn exhaustion_reported() {
        // A total larger than the sum leaves residual mass past the end.
        assert_eq!(select(&[1.0, 1.0], 3.0, 0.9), None);
    }
}

// ── Rates ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod rate_tests {
    use super::*;

    #[test]
    fn guard_zeroes_rate() {
        let model = sir(0.5, 0.2);
        let pop = chain(&[Infected, Susceptible, Infected]);

        let r0 = model.rates(AgentId(0), &pop).unwrap();
        assert_eq!(r0, vec![0.0, 0.2]);

        let r1 = model.rates(AgentId(1), &pop).unwrap();
        assert_eq!(r1, vec![1.0, 0.0]);
    }

    #[test]
    fn invalid_active_rate_is_error() {
        let model = ProcessBuilder::<bool>::new("bad")
            .transition(Transition::<bool>::new("neg").constant_rate(-1.0).when(|ego| *ego.state()).then(|_| vec![]))
            .build()
            .unwrap();
        let pop = Population::isolated(vec![true, false]).unwrap();

        let err = model.rates(AgentId(0), &pop).unwrap_err();
        assert!(matches!(err, ProcessError::InvalidRate { rate, .. } if rate == -1.0));
        // Guard false: the rate is ignored.
        assert_eq!(model.rates(AgentId(1), &pop).unwrap(), vec![0.0]);
    }

    #[test]
    fn nan_rate_is_error() {
        let model = ProcessBuilder::<bool>::new("nan")
            .transition(Transition::<bool>::new("t").constant_rate(f64::NAN).always().then(|_| vec![]))
            .build()
            .unwrap();
        let pop = Population::isolated(vec![true]).unwrap();
        assert!(matches!(model.rates(AgentId(0), &pop), Err(ProcessError::InvalidRate { .. })));
    }
}

// ── Arming ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod arm_tests {
    use super::*;

    fn three_way() -> Rc<Process<bool>> {
        ProcessBuilder::<bool>::new("three")
            .transition(Transition::<bool>::new("a").constant_rate(1.0).always().then(|_| vec![]))
            .transition(Transition::<bool>::new("b").constant_rate(0.0).always().then(|_| vec![]))
            .transition(Transition::<bool>::new("c").constant_rate(3.0).always().then(|_| vec![]))
            .build()
            .unwrap()
    }

    #[test]
    fn draws_wait_then_winner() {
        let model = three_way();
        let pop = Population::isolated(vec![true]).unwrap();
        let mut world = World::new(pop, ScriptedUniform::new([0.5, 0.9]));
        let mut sched = scheduler();

        let armed = model.arm(AgentId(0), &mut world, &mut sched).unwrap();
        let Armed::Scheduled { at, transition } = armed else {
            panic!("expected a scheduled transition, got {armed:?}");
        };
        assert!((at.as_f64() - std::f64::consts::LN_2 / 4.0).abs() < 1e-12);
        assert_eq!(transition, TransitionId(2));
        assert_eq!(world.rng.consumed(), 2);
        assert_eq!(sched.scheduled_time(AgentId(0)), Some(at));
    }

    #[test]
    fn zero_rate_transition_skipped_on_boundary() {
        let model = three_way();
        let pop = Population::isolated(vec![true]).unwrap();
        let mut world = World::new(pop, ScriptedUniform::new([0.0, 0.25]));
        let mut sched = scheduler();

        let armed = model.arm(AgentId(0), &mut world, &mut sched).unwrap();
        assert_eq!(armed, Armed::Scheduled { at: SimTime::ZERO, transition: TransitionId(2) });
    }

    #[test]
    fn dormant_agent_draws_nothing() {
        let model = decay();
        let pop = Population::isolated(vec![false]).unwrap();
        let mut world = World::new(pop, ScriptedUniform::new([0.5]));
        let mut sched = scheduler();

        assert_eq!(model.spawn(AgentId(0), &mut world, &mut sched).unwrap(), Armed::Dormant);
        assert_eq!(world.rng.consumed(), 0);
        assert!(sched.is_empty());
    }

    #[test]
    fn going_dormant_cancels_pending() {
        let model = sir(1.0, 0.0);
        let pop = chain(&[Susceptible, Infected]);
        let mut world = World::new(pop, SimRng::new(3));
        let mut sched = scheduler();

        assert!(matches!(model.arm(AgentId(0), &mut world, &mut sched).unwrap(), Armed::Scheduled { .. }));
        assert!(sched.is_scheduled(AgentId(0)));

        *world.population.state_mut(AgentId(1)) = Recovered;
        assert_eq!(model.arm(AgentId(0), &mut world, &mut sched).unwrap(), Armed::Dormant);
        assert!(!sched.is_scheduled(AgentId(0)));
    }

    #[test]
    fn rearm_replaces_pending() {
        let model = decay();
        let pop = Population::isolated(vec![true]).unwrap();
        let mut world = World::new(pop, ScriptedUniform::new([0.1, 0.0, 0.9, 0.0]));
        let mut sched = scheduler();

        model.arm(AgentId(0), &mut world, &mut sched).unwrap();
        let first = sched.scheduled_time(AgentId(0)).unwrap();
        model.arm(AgentId(0), &mut world, &mut sched).unwrap();
        let second = sched.scheduled_time(AgentId(0)).unwrap();

        assert_eq!(sched.len(), 1);
        assert!(second > first);
    }

    #[test]
    fn unknown_agent_rejected() {
        let model = decay();
        let pop = Population::isolated(vec![true]).unwrap();
        let mut world = World::new(pop, SimRng::new(0));
        let mut sched = scheduler();

        let err = model.arm(AgentId(5), &mut world, &mut sched).unwrap_err();
        assert_eq!(err, ProcessError::UnknownAgent { model: "decay".into(), agent: AgentId(5) });
    }

    #[test]
    fn spawn_all_counts_scheduled() {
        let model = sir(1.0, 0.5);
        let pop = chain(&[Infected, Susceptible, Susceptible, Recovered]);
        let mut world = World::new(pop, SimRng::new(1));
        let mut sched = scheduler();

        // 0 recovers, 1 can be infected; 2 has no infected contact; 3 is inert.
        assert_eq!(model.spawn_all(&mut world, &mut sched).unwrap(), 2);
        assert!(sched.is_scheduled(AgentId(0)));
        assert!(sched.is_scheduled(AgentId(1)));
        assert!(!sched.is_scheduled(AgentId(2)));
    }

    #[test]
    fn failed_rearm_cancels_pending() {
        let broken = Rc::new(std::cell::Cell::new(false));
        let flag = Rc::clone(&broken);
        let model = ProcessBuilder::<bool>::new("fragile")
            .transition(
                Transition::<bool>::new("t")
                    .rate(move |_| if flag.get() { f64::NAN } else { 1.0 })
                    .when(|ego| *ego.state())
                    .then(|ctx| {
                        *ctx.state_mut() = false;
                        vec![ctx.agent()]
                    }),
            )
            .build()
            .unwrap();
        let pop = Population::isolated(vec![true]).unwrap();
        let mut world = World::new(pop, SimRng::new(4));
        let mut sched = scheduler();

        model.arm(AgentId(0), &mut world, &mut sched).unwrap();
        assert!(sched.is_scheduled(AgentId(0)));

        broken.set(true);
        let err = model.arm(AgentId(0), &mut world, &mut sched).unwrap_err();
        assert!(matches!(err, ProcessError::InvalidRate { .. }));
        assert!(!sched.is_scheduled(AgentId(0)));

        assert!(sched.run_next(&mut world).unwrap().is_none());
        assert!(*world.population.state(AgentId(0)));
    }

    #[test]
    fn selection_exhaustion_surfaces_from_arm() {
        // The rounded sum of 0.1, 0.2 and 0.3 exceeds what the scan subtracts,
        // so a draw just below 1 leaves residual mass past the last rate.
        let model = ProcessBuilder::<bool>::new("drift")
            .transition(Transition::<bool>::new("a").constant_rate(0.1).always().then(|_| vec![]))
            .transition(Transition::<bool>::new("b").constant_rate(0.2).always().then(|_| vec![]))
            .transition(Transition::<bool>::new("c").constant_rate(0.3).always().then(|_| vec![]))
            .build()
            .unwrap();
        let rates = vec![0.1, 0.2, 0.3];
        let total: f64 = rates.iter().sum();
        let draw = 1.0 - f64::EPSILON;
        assert_eq!(select(&rates, total, draw), None);

        let pop = Population::isolated(vec![true]).unwrap();
        let mut world = World::new(pop, ScriptedUniform::new([0.5, draw]));
        let mut sched = scheduler();

        let err = model.arm(AgentId(0), &mut world, &mut sched).unwrap_err();
        assert_eq!(
            err,
            ProcessError::SelectionExhausted { model: "drift".into(), agent: AgentId(0), rates, total, draw }
        );
        assert!(!sched.is_scheduled(AgentId(0)));
    }

    #[test]
    fn selection_frequencies_follow_rates() {
        let model = ProcessBuilder::<bool>::new("split")
            .transition(Transition::<bool>::new("likely").constant_rate(3.0).always().then(|_| vec![]))
            .transition(Transition::<bool>::new("unlikely").constant_rate(1.0).always().then(|_| vec![]))
            .build()
            .unwrap();
        let pop = Population::isolated(vec![true]).unwrap();
        let mut world = World::new(pop, SimRng::new(2024));
        let mut sched = scheduler();

        let mut likely = 0;
        for _ in 0..10_000 {
            match model.arm(AgentId(0), &mut world, &mut sched).unwrap() {
                Armed::Scheduled { transition: TransitionId(0), .. } => likely += 1,
                Armed::Scheduled { .. } => {}
                Armed::Dormant => panic!("agent has positive total rate"),
            }
        }
        assert!((7_325..=7_675).contains(&likely), "likely fired {likely} times");
    }
}

// ── Firing ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod fire_tests {
    use super::*;

    #[test]
    fn two_agents_decay_once_each() {
        let model = decay();
        let pop = pair();
        assert_eq!(pop.contacts(AgentId(0)), &[AgentId(1)]);
        let mut world = World::new(pop, ScriptedUniform::new([0.5, 0.0, 0.7, 0.0]));
        let mut sched = scheduler();

        assert_eq!(model.spawn_all(&mut world, &mut sched).unwrap(), 2);
        let fired = sched.run_until(SimTime::new(5.0).unwrap(), &mut world).unwrap();

        assert_eq!(fired, 2);
        assert_eq!(world.population.states(), &[false, false]);
        assert!(sched.is_empty());
        assert_eq!(sched.now(), SimTime::new(5.0).unwrap());
        assert_eq!(world.rng.consumed(), 4);

        let events = world.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].agent, AgentId(0));
        assert!((events[0].time.as_f64() - std::f64::consts::LN_2).abs() < 1e-12);
        assert_eq!(events[1].agent, AgentId(1));
        assert!((events[1].time.as_f64() + 0.3f64.ln()).abs() < 1e-12);
        assert_eq!(&*events[1].label, "decay");
    }

    #[test]
    fn affected_neighbour_woken() {
        let model = sir(1.0, 0.0);
        let pop = chain(&[Infected, Susceptible, Susceptible]);
        let mut world = World::new(pop, SimRng::new(9));
        let mut sched = scheduler();

        assert_eq!(model.spawn_all(&mut world, &mut sched).unwrap(), 1);
        assert!(!sched.is_scheduled(AgentId(2)));

        let fired = sched.run_next(&mut world).unwrap().unwrap();
        assert_eq!(fired.agent, AgentId(1));
        assert_eq!(*world.population.state(AgentId(1)), Infected);
        // 1 is now infected with no recovery; only 2 remains armed.
        assert!(sched.is_scheduled(AgentId(2)));
        assert_eq!(sched.len(), 1);
    }

    #[test]
    fn duplicate_affected_rearmed_once() {
        let model = ProcessBuilder::<bool>::new("dup")
            .transition(Transition::<bool>::new("flip").constant_rate(1.0).when(|ego| *ego.state()).then(|ctx| {
                *ctx.state_mut() = false;
                vec![ctx.agent(), ctx.agent(), ctx.agent()]
            }))
            .build()
            .unwrap();
        let pop = Population::isolated(vec![true]).unwrap();
        let mut world = World::new(pop, ScriptedUniform::new([0.5, 0.0]));
        let mut sched = scheduler();

        model.spawn_all(&mut world, &mut sched).unwrap();
        sched.run_next(&mut world).unwrap();
        assert_eq!(world.rng.consumed(), 2);
    }

    #[test]
    fn affected_outside_population_aborts() {
        let model = ProcessBuilder::<bool>::new("stray")
            .transition(Transition::<bool>::new("t").constant_rate(1.0).when(|ego| *ego.state()).then(|ctx| {
                *ctx.state_mut() = false;
                vec![AgentId(42)]
            }))
            .build()
            .unwrap();
        let pop = Population::isolated(vec![true]).unwrap();
        let mut world = World::new(pop, SimRng::new(0));
        let mut sched = scheduler();

        model.spawn_all(&mut world, &mut sched).unwrap();
        let err = sched.run_next(&mut world).unwrap_err();
        assert_eq!(err, ProcessError::UnknownAgent { model: "stray".into(), agent: AgentId(42) });
        assert_eq!(sched.fired_count(), 1);
    }

    #[test]
    fn failed_rearm_does_not_skip_later_agents() {
        // Agent 0 fires and reports [1, 2]; agent 1 now has an invalid rate.
        let model = ProcessBuilder::<u8>::new("cascade")
            .transition(Transition::<u8>::new("go").constant_rate(1.0).when(|ego| *ego.state() == 1).then(|ctx| {
                *ctx.state_mut() = 0;
                vec![AgentId(1), AgentId(2)]
            }))
            .transition(Transition::<u8>::new("bad").constant_rate(-1.0).when(|ego| *ego.state() == 2).then(|_| vec![]))
            .build()
            .unwrap();
        let pop = Population::isolated(vec![1u8, 1, 1]).unwrap();
        // 0 fires first; the script wraps round for 2's re-arm.
        let mut world = World::new(pop, ScriptedUniform::new([0.1, 0.0, 0.9, 0.0, 0.9, 0.0]));
        let mut sched = scheduler();

        assert_eq!(model.spawn_all(&mut world, &mut sched).unwrap(), 3);
        let before_2 = sched.scheduled_time(AgentId(2)).unwrap();
        *world.population.state_mut(AgentId(1)) = 2;

        let err = sched.run_next(&mut world).unwrap_err();
        assert!(matches!(err, ProcessError::InvalidRate { agent: AgentId(1), .. }));
        assert!(!sched.is_scheduled(AgentId(1)));
        // Agent 2 was still re-armed, drawing its wait from the current time.
        let after_2 = sched.scheduled_time(AgentId(2)).unwrap();
        assert_ne!(after_2, before_2);
        assert!((after_2.as_f64() + 2.0 * 0.9f64.ln()).abs() < 1e-12);
        assert_eq!(world.rng.consumed(), 8);
    }

    #[test]
    fn action_draws_from_run_stream() {
        let model = ProcessBuilder::<bool>::new("coin")
            .transition(Transition::<bool>::new("toss").constant_rate(1.0).when(|ego| *ego.state()).then(|ctx| {
                let heads = ctx.rng().bernoulli(0.5);
                *ctx.state_mut() = heads;
                vec![ctx.agent()]
            }))
            .build()
            .unwrap();
        let pop = Population::isolated(vec![true]).unwrap();
        // wait, winner, coin (tails), then nothing: dormant.
        let mut world = World::new(pop, ScriptedUniform::new([0.5, 0.0, 0.9]));
        let mut sched = scheduler();

        model.spawn_all(&mut world, &mut sched).unwrap();
        sched.run_next(&mut world).unwrap();
        assert!(!*world.population.state(AgentId(0)));
        assert_eq!(world.rng.consumed(), 3);
        assert!(sched.is_empty());
    }

    #[test]
    fn recording_can_be_disabled() {
        let model = decay();
        let pop = Population::isolated(vec![true]).unwrap();
        let mut world = World::new(pop, SimRng::new(0)).with_recording(false);
        let mut sched = scheduler();

        model.spawn_all(&mut world, &mut sched).unwrap();
        sched.run_until(SimTime::new(100.0).unwrap(), &mut world).unwrap();
        assert!(!world.population.state(AgentId(0)));
        assert!(world.events().is_empty());
    }
}

// ── Registry ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod registry_tests {
    use super::*;

    #[test]
    fn register_and_lookup() {
        let mut registry = ModelRegistry::new();
        registry.register(sir(1.0, 1.0)).unwrap();
        registry
            .declare(ProcessBuilder::<Status>::new("si").transition(Transition::poisson(
                "infect",
                |_| 1.0,
                |ego| *ego.state() == Susceptible,
                |ctx| {
                    *ctx.state_mut() = Infected;
                    vec![ctx.agent()]
                },
            )))
            .unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["si", "sir"]);
        assert_eq!(registry.get("sir").unwrap().len(), 2);
        assert!(registry.contains("si"));
    }

    #[test]
    fn duplicate_and_unknown_names() {
        let mut registry = ModelRegistry::new();
        registry.register(sir(1.0, 1.0)).unwrap();
        assert_eq!(
            registry.register(sir(2.0, 2.0)).unwrap_err(),
            ProcessError::DuplicateModel("sir".into())
        );
        assert_eq!(registry.get("seir").unwrap_err(), ProcessError::UnknownModel("seir".into()));
    }
}
