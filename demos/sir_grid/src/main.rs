//! sir_grid: SIR / SIS epidemic on a periodic lattice.
//!
//! Every cell is one agent.  Susceptible cells are infected at rate `beta`
//! per infected neighbour; infected cells recover at rate `gamma`.  Only
//! agents with a possible transition hold a pending event, so the run cost
//! follows the epidemic front rather than the lattice size.
//!
//! ```text
//! cargo run -p sir_grid                     # built-in defaults
//! cargo run -p sir_grid -- demo.json        # overrides from a JSON file
//! RUST_LOG=ssa_process=debug cargo run -p sir_grid
//! ```

mod grid;
mod models;

use std::marker::PhantomData;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ssa_agent::Population;
use ssa_core::{SimConfig, SimTime};
use ssa_process::TransitionEvent;
use ssa_sim::{EventCounter, SimBuilder, SimObserver};

use grid::Grid;
use models::{Compartments, INFECT, RECOVER, SirStatus, SisStatus};

// ── Configuration ─────────────────────────────────────────────────────────────

/// Everything the demo reads from its optional JSON file.  Missing fields
/// keep their defaults.
#[derive(Debug, Deserialize)]
#[serde(default)]
struct DemoConfig {
    sim:              SimConfig,
    model:            String,
    width:            usize,
    height:           usize,
    initial_infected: usize,
    beta:             f64,
    gamma:            f64,
    /// Print prevalence every this many time units (0 disables).
    report_every:     f64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            sim: SimConfig { seed: 42, end_time: 100.0, record_events: true },
            model:            "sir".to_string(),
            width:            64,
            height:           64,
            initial_infected: 5,
            beta:             0.4,
            gamma:            0.1,
            report_every:     10.0,
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<DemoConfig> {
    let Some(path) = path else {
        return Ok(DemoConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

// ── Observer ──────────────────────────────────────────────────────────────────

/// Tracks compartment counts and prints them at a fixed time interval.
///
/// Counts are taken once at start and then shifted per event from its
/// transition label, so an event costs O(1) however large the lattice.
struct Prevalence<C> {
    counter:     EventCounter,
    counts:      Vec<usize>,
    interval:    f64,
    next_report: f64,
    peak:        usize,
    peak_time:   SimTime,
    _status:     PhantomData<C>,
}

impl<C: Compartments> Prevalence<C> {
    fn new(interval: f64) -> Self {
        Self {
            counter:     EventCounter::new(),
            counts:      vec![0; C::NAMES.len()],
            interval,
            next_report: 0.0,
            peak:        0,
            peak_time:   SimTime::ZERO,
            _status:     PhantomData,
        }
    }

    fn infected(&self) -> usize {
        self.counts[C::INFECTED.slot()]
    }

    fn header() {
        print!("{:>12} ", "time");
        for name in C::NAMES {
            print!(" {name:>8}");
        }
        println!();
        println!("{}", "-".repeat(13 + 9 * C::NAMES.len()));
    }

    fn report(&self, now: SimTime) {
        print!("{:>12} ", now.to_string());
        for n in &self.counts {
            print!(" {n:>8}");
        }
        println!();
    }
}

impl<C: Compartments> SimObserver<C> for Prevalence<C> {
    fn on_start(&mut self, now: SimTime, population: &Population<C>) {
        self.counts = tally(population);
        self.peak = self.infected();
        self.peak_time = now;
        Self::header();
        self.report(now);
        self.next_report = now.as_f64() + self.interval;
    }

    fn on_event(&mut self, event: &TransitionEvent, population: &Population<C>) {
        <EventCounter as SimObserver<C>>::on_event(&mut self.counter, event, population);

        if let Some((from, to)) = C::shift(&event.label) {
            self.counts[from.slot()] = self.counts[from.slot()].saturating_sub(1);
            self.counts[to.slot()] += 1;
        }
        if self.infected() > self.peak {
            self.peak = self.infected();
            self.peak_time = event.time;
        }
        if self.interval > 0.0 && event.time.as_f64() >= self.next_report {
            self.report(event.time);
            while self.next_report <= event.time.as_f64() {
                self.next_report += self.interval;
            }
        }
    }

    fn on_sim_end(&mut self, now: SimTime, _population: &Population<C>) {
        self.report(now);
    }
}

fn tally<C: Compartments>(population: &Population<C>) -> Vec<usize> {
    let mut counts = vec![0; C::NAMES.len()];
    for state in population.states() {
        counts[state.slot()] += 1;
    }
    counts
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let path = std::env::args().nth(1);
    let cfg = load_config(path.as_deref().map(Path::new))?;
    info!(?cfg, "configuration loaded");

    println!("=== sir_grid: {} on a {}×{} torus ===", cfg.model, cfg.width, cfg.height);
    println!(
        "beta {}  |  gamma {}  |  seed {}  |  horizon {}",
        cfg.beta, cfg.gamma, cfg.sim.seed, cfg.sim.end_time
    );
    println!();

    match cfg.model.as_str() {
        "sir" => run::<SirStatus>(&cfg),
        "sis" => run::<SisStatus>(&cfg),
        other => bail!("unknown model {other:?} (expected \"sir\" or \"sis\")"),
    }
}

fn run<C: Compartments>(cfg: &DemoConfig) -> Result<()> {
    // 1. Models.
    let registry = C::registry(cfg.beta, cfg.gamma)?;

    // 2. Population.
    let grid = Grid {
        width:            cfg.width,
        height:           cfg.height,
        initial_infected: cfg.initial_infected,
        seed:             cfg.sim.seed.wrapping_add(1),
    };

    // 3. Sim.
    let mut sim = SimBuilder::<C, Grid>::new(cfg.sim.clone(), grid)
        .model(registry, C::MODEL)
        .build()?;

    // 4. Run.
    let mut obs = Prevalence::<C>::new(cfg.report_every);
    let t0 = Instant::now();
    let fired = sim.run(&mut obs)?;
    let elapsed = t0.elapsed();

    // 5. Summary.
    println!();
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  transitions fired : {fired}");
    println!("  still pending     : {}", sim.pending());
    println!("  peak infected     : {} at {}", obs.peak, obs.peak_time);
    println!();
    println!("{:<8} {:<10} {:>10}", "Model", "Transition", "Count");
    println!("{}", "-".repeat(30));
    for (model, label, n) in obs.counter.iter() {
        println!("{model:<8} {label:<10} {n:>10}");
    }

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
