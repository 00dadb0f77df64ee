//! Seedable randomness for reproducible behaviors

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Per-creature deterministic RNG (seeded)
#[derive(Debug, Clone)]
pub struct DeterministicRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl DeterministicRng {
    /// Create a generator from a seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed this generator was created with
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform value in `[0, 1)`
    pub fn unit(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }

    /// Uniform value in `[min, max)`; returns `min` for an empty range
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        self.rng.gen_range(min..max)
    }

    /// Uniform index in `[0, len)`
    pub fn index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.rng.gen_range(0..len)
    }

    /// True with probability `p`
    pub fn chance(&mut self, p: f32) -> bool {
        self.unit() < p
    }

    /// Either `1.0` or `-1.0`
    pub fn sign(&mut self) -> f32 {
        if self.rng.gen::<bool>() {
            1.0
        } else {
            -1.0
        }
    }

    /// Pick a random element
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            items.get(self.index(items.len()))
        }
    }
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new(42)
    }
}
