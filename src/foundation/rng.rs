use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

/// Randomness capability threaded through sampling, placement and splitting.
///
/// Every random decision in the crate goes through this trait so a run can be
/// replayed from its seed.
pub trait RandomSource {
    /// Uniform integer in `0..=max`.
    fn uniform_inclusive(&mut self, max: u32) -> u32;

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize;
}

/// Seeded xoshiro256++ stream.
#[derive(Clone, Debug)]
pub struct SeededRandom {
    seed: u64,
    rng: Xoshiro256PlusPlus,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }

    /// Seed drawn from the thread-local OS-seeded generator.
    pub fn from_entropy() -> Self {
        Self::new(rand::rng().random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SeededRandom {
    fn uniform_inclusive(&mut self, max: u32) -> u32 {
        self.rng.random_range(0..=max)
    }

    fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        self.rng.random_range(0..len)
    }
}

/// In-place Fisher-Yates shuffle.
pub fn shuffle<T, R: RandomSource + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.index(i + 1);
        items.swap(i, j);
    }
}

/// Uniform pick of `k` distinct elements (all of them when `k >= len`), in pick order.
pub fn choose_distinct<T: Clone, R: RandomSource + ?Sized>(
    items: &[T],
    k: usize,
    rng: &mut R,
) -> Vec<T> {
    let mut pool: Vec<T> = items.to_vec();
    let k = k.min(pool.len());
    for i in 0..k {
        let j = i + rng.index(pool.len() - i);
        pool.swap(i, j);
    }
    pool.truncate(k);
    pool
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/rng.rs"]
mod tests;
