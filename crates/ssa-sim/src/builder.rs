//! Fluent builder for constructing a [`Sim`].

use std::rc::Rc;

use ssa_agent::PopulationSource;
use ssa_core::{SimConfig, SimRng, UniformSource};
use ssa_process::{ModelRegistry, Process, ProcessScheduler, World};
use tracing::warn;

use crate::{Sim, SimError, SimResult};

/// Where the model to run comes from.
enum ModelChoice<S> {
    Unset,
    Process(Rc<Process<S>>),
    Named { registry: ModelRegistry<S>, name: String },
}

/// Fluent builder for [`Sim<S, R>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: seed, horizon, event recording
/// - a [`PopulationSource`], e.g. a `Population` or a `PopulationBuilder`
/// - a model, either directly (`.process(p)`) or by name from a
///   [`ModelRegistry`] (`.model(registry, name)`)
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, population)
///     .model(registry, "sir")
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
///
/// Everything is validated in [`build`](Self::build), before any simulated
/// time advances.
pub struct SimBuilder<S, P> {
    config: SimConfig,
    source: P,
    model:  ModelChoice<S>,
}

impl<S: 'static, P: PopulationSource<S>> SimBuilder<S, P> {
    /// Create a builder with the configuration and population.
    pub fn new(config: SimConfig, source: P) -> Self {
        Self { config, source, model: ModelChoice::Unset }
    }

    /// Run `process`.
    pub fn process(mut self, process: Rc<Process<S>>) -> Self {
        self.model = ModelChoice::Process(process);
        self
    }

    /// Run the model registered as `name`.  The lookup happens in `build`.
    pub fn model(mut self, registry: ModelRegistry<S>, name: impl Into<String>) -> Self {
        self.model = ModelChoice::Named { registry, name: name.into() };
        self
    }

    /// Build with a [`SimRng`] seeded from `config.seed`.
    pub fn build(self) -> SimResult<Sim<S>> {
        let rng = SimRng::new(self.config.seed);
        self.build_with_rng(rng)
    }

    /// Build with a caller-supplied random source (e.g. a `ScriptedUniform`).
    /// `config.seed` is ignored.
    pub fn build_with_rng<R: UniformSource + 'static>(self, rng: R) -> SimResult<Sim<S, R>> {
        let end_time = self.config.end_time()?;

        let process = match self.model {
            ModelChoice::Unset => {
                return Err(SimError::Config("no model selected".to_string()));
            }
            ModelChoice::Process(p) => p,
            ModelChoice::Named { registry, name } => registry.get(&name)?,
        };

        let population = self.source.populate()?;
        if population.is_empty() {
            warn!(model = process.name(), "population is empty; the run will do nothing");
        }

        let world = World::new(population, rng).with_recording(self.config.record_events);

        Ok(Sim {
            config: self.config,
            end_time,
            process,
            world,
            scheduler: ProcessScheduler::new(),
            spawned: false,
        })
    }
}
