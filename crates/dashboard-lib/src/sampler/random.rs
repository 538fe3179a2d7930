//! Random sources for the sampler
//!
//! The sampler never touches `rand` directly so tests can swap in a
//! fixed source and check the deterministic parts of the generators.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform random values
pub trait RandomSource: Send {
    /// Uniform integer in `[low, high]`
    fn int_in(&mut self, low: i64, high: i64) -> i64;

    /// Uniform float in `[low, high]`
    fn float_in(&mut self, low: f64, high: f64) -> f64;

    /// Uniform float in `[0, 1)`
    fn unit(&mut self) -> f64;
}

/// Production source backed by a `StdRng`
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    /// Seed from OS entropy
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence for a given seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for StdRandom {
    fn int_in(&mut self, low: i64, high: i64) -> i64 {
        self.rng.gen_range(low..=high)
    }

    fn float_in(&mut self, low: f64, high: f64) -> f64 {
        self.rng.gen_range(low..=high)
    }

    fn unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Source that returns the same value every time, clamped into the
/// requested range
///
/// `FixedRandom::zero()` gives "no jitter": integer draws return 0 (or the
/// nearest bound), float draws return the lower bound and `unit()` returns
/// 0.5.
#[derive(Debug, Clone, Copy)]
pub struct FixedRandom {
    pub int: i64,
    pub float: f64,
    pub unit: f64,
}

impl FixedRandom {
    pub fn new(int: i64, float: f64, unit: f64) -> Self {
        Self { int, float, unit }
    }

    pub fn zero() -> Self {
        Self::new(0, 0.0, 0.5)
    }
}

impl RandomSource for FixedRandom {
    fn int_in(&mut self, low: i64, high: i64) -> i64 {
        self.int.clamp(low, high)
    }

    fn float_in(&mut self, low: f64, high: f64) -> f64 {
        self.float.clamp(low, high)
    }

    fn unit(&mut self) -> f64 {
        self.unit.clamp(0.0, 1.0 - f64::EPSILON)
    }
}
