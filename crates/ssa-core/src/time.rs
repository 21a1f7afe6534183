//! Simulation time model.
//!
//! # Design
//!
//! Time is continuous: a `SimTime` wraps an `f64` that is guaranteed finite.
//! Waiting times are sampled from exponential distributions, so there is no
//! natural tick.  Excluding NaN and the infinities at construction makes
//! `SimTime` totally ordered, which lets it key a `BTreeMap` directly.
//!
//! Units are whatever the model's rates are expressed in: a rate of `2.0`
//! means two expected firings per unit of `SimTime`.

use std::cmp::Ordering;
use std::fmt;

use crate::{CoreError, CoreResult};

// ── SimTime ───────────────────────────────────────────────────────────────────

/// An absolute, finite point on the simulation clock.
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "f64", into = "f64"))]
pub struct SimTime(f64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0.0);

    /// Wrap `t`, rejecting NaN and infinities.
    pub fn new(t: f64) -> CoreResult<SimTime> {
        if t.is_finite() {
            // Normalise -0.0 so that equal times compare and hash identically.
            Ok(SimTime(t + 0.0))
        } else {
            Err(CoreError::InvalidTime(t))
        }
    }

    #[inline]
    pub fn as_f64(self) -> f64 {
        self.0
    }

    /// `self + delta`, failing if the sum is not finite.
    pub fn checked_add(self, delta: f64) -> CoreResult<SimTime> {
        SimTime::new(self.0 + delta)
    }

    /// Time elapsed from `earlier` to `self` (negative if `earlier > self`).
    #[inline]
    pub fn since(self, earlier: SimTime) -> f64 {
        self.0 - earlier.0
    }
}

impl PartialEq for SimTime {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SimTime {}

impl PartialOrd for SimTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SimTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl std::hash::Hash for SimTime {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl TryFrom<f64> for SimTime {
    type Error = CoreError;
    fn try_from(t: f64) -> CoreResult<SimTime> {
        SimTime::new(t)
    }
}

impl From<SimTime> for f64 {
    #[inline]
    fn from(t: SimTime) -> f64 {
        t.0
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={:.6}", self.0)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Typically loaded from a JSON file by the application crate (with the
/// `serde` feature) and passed to the simulation builder.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Horizon for `Sim::run`.  Events scheduled after this time stay queued.
    pub end_time: f64,

    /// Keep a `TransitionEvent` record for every fired transition so that
    /// observers can see them.  Off means observers only get start/end hooks.
    pub record_events: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            end_time: 1.0,
            record_events: true,
        }
    }
}

impl SimConfig {
    /// Reject horizons that are negative or not finite.
    pub fn validate(&self) -> CoreResult<()> {
        if !self.end_time.is_finite() || self.end_time < 0.0 {
            return Err(CoreError::Config(format!(
                "end_time must be finite and non-negative, got {}",
                self.end_time
            )));
        }
        Ok(())
    }

    /// The configured horizon as a `SimTime`.
    pub fn end_time(&self) -> CoreResult<SimTime> {
        self.validate()?;
        SimTime::new(self.end_time)
    }
}
