//! Simulation observer trait for progress reporting and data collection.

use std::collections::BTreeMap;

use ssa_agent::Population;
use ssa_core::SimTime;
use ssa_process::TransitionEvent;

/// Callbacks invoked by [`Sim::run`][crate::Sim::run].
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: prevalence printer
///
/// ```rust,ignore
/// struct Prevalence;
///
/// impl SimObserver<SirStatus> for Prevalence {
///     fn on_event(&mut self, event: &TransitionEvent, population: &Population<SirStatus>) {
///         let infected = population.count_where(|s| *s == SirStatus::Infected);
///         println!("{}: {} infected", event.time, infected);
///     }
/// }
/// ```
pub trait SimObserver<S> {
    /// Called once after every agent has been spawned, before any event fires.
    fn on_start(&mut self, _now: SimTime, _population: &Population<S>) {}

    /// Called for each recorded transition, after the transition's affected
    /// agents have been re-armed.
    ///
    /// Only fires when `SimConfig::record_events` is on.
    fn on_event(&mut self, _event: &TransitionEvent, _population: &Population<S>) {}

    /// Called once when the clock has reached the horizon.
    fn on_sim_end(&mut self, _now: SimTime, _population: &Population<S>) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want callbacks.
pub struct NoopObserver;

impl<S> SimObserver<S> for NoopObserver {}

/// Counts fired transitions per `(model, transition label)`.
#[derive(Clone, Debug, Default)]
pub struct EventCounter {
    counts: BTreeMap<(String, String), u64>,
    total:  u64,
}

impl EventCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every counted transition.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// How often `label` of `model` fired.
    pub fn get(&self, model: &str, label: &str) -> u64 {
        self.counts
            .get(&(model.to_string(), label.to_string()))
            .copied()
            .unwrap_or(0)
    }

    /// `(model, label, count)` triples, sorted by model then label.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, u64)> + '_ {
        self.counts
            .iter()
            .map(|((model, label), &n)| (model.as_str(), label.as_str(), n))
    }
}

impl<S> SimObserver<S> for EventCounter {
    fn on_event(&mut self, event: &TransitionEvent, _population: &Population<S>) {
        *self
            .counts
            .entry((event.model.to_string(), event.label.to_string()))
            .or_insert(0) += 1;
        self.total += 1;
    }
}
