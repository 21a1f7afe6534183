//! Random sources for waiting-time and transition sampling.
//!
//! # Determinism strategy
//!
//! The engine is single-threaded and consumes one stream of uniform reals.
//! That stream is threaded explicitly through every spawn, re-arm, and
//! action call as a `&mut dyn UniformSource`; nothing reads ambient global
//! state.  Re-running with the same seed and the same event order therefore
//! reproduces a run bit-for-bit.
//!
//! Two implementations ship here:
//!
//! - [`SimRng`]: a seeded `SmallRng`, used for real runs.
//! - [`ScriptedUniform`]: replays a fixed list of draws, used when a caller
//!   needs to know exactly which `u` each sampling step sees.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

// ── UniformSource ─────────────────────────────────────────────────────────────

/// A source of uniform reals in `[0, 1)`.
///
/// Only [`next_uniform`](Self::next_uniform) is required; the helpers are
/// built on it so that every draw, whatever its purpose, advances the same
/// stream.
pub trait UniformSource {
    /// Next draw, uniform in `[0, 1)`.
    fn next_uniform(&mut self) -> f64;

    /// Uniform index in `0..n`, or `None` when `n == 0`.
    fn index(&mut self, n: usize) -> Option<usize> {
        if n == 0 {
            return None;
        }
        let i = (self.next_uniform() * n as f64) as usize;
        Some(i.min(n - 1))
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    fn bernoulli(&mut self, p: f64) -> bool {
        self.next_uniform() < p.clamp(0.0, 1.0)
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Seeded simulation RNG.  Used only on the single execution thread.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Uniform sample from `range`, for setup code such as seeding initial
    /// states.  Advances the same stream as [`UniformSource::next_uniform`].
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }
}

impl UniformSource for SimRng {
    #[inline]
    fn next_uniform(&mut self) -> f64 {
        self.0.r#gen::<f64>()
    }
}

// ── ScriptedUniform ───────────────────────────────────────────────────────────

/// Replays a fixed sequence of draws, wrapping around when exhausted.
///
/// Values outside `[0, 1)` are clamped into it on construction so the
/// `UniformSource` contract always holds.
#[derive(Clone, Debug)]
pub struct ScriptedUniform {
    draws: Vec<f64>,
    cursor: usize,
    consumed: u64,
}

impl ScriptedUniform {
    /// Build from a non-empty list of draws.  An empty list yields a source
    /// that always returns `0.0`.
    pub fn new(draws: impl IntoIterator<Item = f64>) -> Self {
        let mut draws: Vec<f64> = draws
            .into_iter()
            .map(|u| if u.is_nan() { 0.0 } else { u.clamp(0.0, 1.0 - f64::EPSILON) })
            .collect();
        if draws.is_empty() {
            draws.push(0.0);
        }
        Self { draws, cursor: 0, consumed: 0 }
    }

    /// How many draws have been taken so far.
    pub fn consumed(&self) -> u64 {
        self.consumed
    }
}

impl UniformSource for ScriptedUniform {
    fn next_uniform(&mut self) -> f64 {
        let u = self.draws[self.cursor];
        self.cursor = (self.cursor + 1) % self.draws.len();
        self.consumed += 1;
        u
    }
}
