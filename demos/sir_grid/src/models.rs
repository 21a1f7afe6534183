//! Epidemic models.  Each model version has its own closed status set.

use std::fmt;

use ssa_process::{ModelRegistry, ProcessBuilder, ProcessResult, Transition};

/// Label of the transition that moves an agent from susceptible to infected.
pub const INFECT: &str = "infect";
/// Label of the transition that ends an infection.
pub const RECOVER: &str = "recover";

/// A status set the lattice demo can seed and tally.
pub trait Compartments: Copy + Eq + fmt::Debug + 'static {
    /// Model name in the registry.
    const MODEL: &'static str;
    /// Column headers, indexed by [`slot`](Self::slot).
    const NAMES: &'static [&'static str];
    const SUSCEPTIBLE: Self;
    const INFECTED: Self;
    /// Where `recover` sends an agent.
    const RECOVERED: Self;

    fn slot(self) -> usize;

    /// The `(from, to)` pair a transition label implies.
    fn shift(label: &str) -> Option<(Self, Self)> {
        match label {
            INFECT => Some((Self::SUSCEPTIBLE, Self::INFECTED)),
            RECOVER => Some((Self::INFECTED, Self::RECOVERED)),
            _ => None,
        }
    }

    /// Infection at `beta` per infected contact, recovery at `gamma`.
    fn registry(beta: f64, gamma: f64) -> ProcessResult<ModelRegistry<Self>> {
        let mut registry = ModelRegistry::new();
        registry.declare(
            ProcessBuilder::<Self>::new(Self::MODEL)
                .transition(infection(beta))
                .transition(recovery(gamma)),
        )?;
        Ok(registry)
    }
}

/// Recovery is permanent.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SirStatus {
    Susceptible,
    Infected,
    Recovered,
}

impl Compartments for SirStatus {
    const MODEL: &'static str = "sir";
    const NAMES: &'static [&'static str] = &["S", "I", "R"];
    const SUSCEPTIBLE: Self = SirStatus::Susceptible;
    const INFECTED: Self = SirStatus::Infected;
    const RECOVERED: Self = SirStatus::Recovered;

    fn slot(self) -> usize {
        self as usize
    }
}

/// Recovery returns the agent to susceptible.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SisStatus {
    Susceptible,
    Infected,
}

impl Compartments for SisStatus {
    const MODEL: &'static str = "sis";
    const NAMES: &'static [&'static str] = &["S", "I"];
    const SUSCEPTIBLE: Self = SisStatus::Susceptible;
    const INFECTED: Self = SisStatus::Infected;
    const RECOVERED: Self = SisStatus::Susceptible;

    fn slot(self) -> usize {
        self as usize
    }
}

fn infection<C: Compartments>(beta: f64) -> Transition<C> {
    Transition::<C>::new(INFECT)
        .rate(move |ego| beta * ego.count_contacts(|s| *s == C::INFECTED) as f64)
        .when(|ego| *ego.state() == C::SUSCEPTIBLE)
        .then(|ctx| {
            *ctx.state_mut() = C::INFECTED;
            ctx.self_and_contacts()
        })
}

fn recovery<C: Compartments>(gamma: f64) -> Transition<C> {
    Transition::<C>::new(RECOVER)
        .constant_rate(gamma)
        .when(|ego| *ego.state() == C::INFECTED)
        .then(|ctx| {
            *ctx.state_mut() = C::RECOVERED;
            ctx.self_and_contacts()
        })
}
