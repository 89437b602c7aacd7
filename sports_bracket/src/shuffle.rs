//! Injectable random source for placement and group draws.

use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};

/// Capability to reorder a slice uniformly at random.
///
/// Builders take a `Shuffler` instead of reaching for a global RNG so tests can
/// make draws deterministic.
pub trait Shuffler {
    fn shuffle<T>(&mut self, items: &mut [T]);
}

/// Fisher-Yates shuffler backed by any `rand` generator
pub struct RandomShuffler<R: Rng> {
    rng: R,
}

impl RandomShuffler<rand::rngs::ThreadRng> {
    /// Create a shuffler over the thread-local generator
    pub fn new() -> Self {
        Self { rng: rand::rng() }
    }
}

impl Default for RandomShuffler<rand::rngs::ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomShuffler<StdRng> {
    /// Create a reproducible shuffler from a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> RandomShuffler<R> {
    pub fn from_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Shuffler for RandomShuffler<R> {
    fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}

/// Leaves every slice untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepOrder;

impl Shuffler for KeepOrder {
    fn shuffle<T>(&mut self, _items: &mut [T]) {}
}

/// Reverses every slice; deterministic but distinct from `KeepOrder`
#[derive(Debug, Clone, Copy, Default)]
pub struct ReverseOrder;

impl Shuffler for ReverseOrder {
    fn shuffle<T>(&mut self, items: &mut [T]) {
        items.reverse();
    }
}
