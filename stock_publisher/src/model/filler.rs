//! Source of the random draws used to backfill missing fields.
//!
//! Every synthetic value in a `StockInfo` comes from a `Filler`, so tests can
//! swap the random generator for a deterministic one without touching the
//! aggregation code.

use rand::Rng;
use rand::rngs::ThreadRng;

/// Supplies values for fields no data source provided.
pub trait Filler {
    /// A value in `[low, high]`.
    fn uniform(&mut self, low: f64, high: f64) -> f64;

    /// An integer in `[low, high]`.
    fn uniform_int(&mut self, low: u64, high: u64) -> u64;
}

/// Production filler: independent uniform draws from `rand`.
pub struct UniformFiller<R = ThreadRng> {
    rng: R,
}

impl UniformFiller {
    /// Create a filler backed by the thread-local generator.
    pub fn new() -> Self {
        Self { rng: rand::rng() }
    }
}

impl Default for UniformFiller {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> UniformFiller<R> {
    /// Create a filler backed by `rng`, e.g. a seeded `StdRng`.
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Filler for UniformFiller<R> {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        if low >= high {
            return low;
        }
        self.rng.random_range(low..=high)
    }

    fn uniform_int(&mut self, low: u64, high: u64) -> u64 {
        if low >= high {
            return low;
        }
        self.rng.random_range(low..=high)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Filler;

    /// Always returns the point at `fraction` of the requested range.
    pub(crate) struct FractionFiller(pub f64);

    impl Filler for FractionFiller {
        fn uniform(&mut self, low: f64, high: f64) -> f64 {
            low + (high - low) * self.0
        }

        fn uniform_int(&mut self, low: u64, high: u64) -> u64 {
            low + ((high - low) as f64 * self.0) as u64
        }
    }
}
