use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const MULTIPLIER_A: i64 = 1103515245;
const INCREMENT_C: i64 = 12345;
const DEFAULT_SEED: i64 = 3819201;
const MODULUS: i64 = i32::MAX as i64;

/// Source of randomness for rollouts and for the fallback move of an unexpanded root.
pub trait RandomGenerator: Default {
    /// Uniform integer in `from..to`. `to` must be greater than `from`.
    fn next_range(&mut self, from: usize, to: usize) -> usize;

    /// Uniformly picks one element, or `None` for an empty slice.
    fn choose<'a, V>(&mut self, items: &'a [V]) -> Option<&'a V> {
        if items.is_empty() {
            return None;
        }
        items.get(self.next_range(0, items.len()))
    }
}

/// Thread-local entropy from `rand`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardRandomGenerator;

impl RandomGenerator for StandardRandomGenerator {
    fn next_range(&mut self, from: usize, to: usize) -> usize {
        rand::rng().random_range(from..to)
    }
}

/// A seedable `StdRng`, for reproducible runs that still use a proper generator.
#[derive(Debug, Clone)]
pub struct SeededRandomGenerator {
    rng: StdRng,
}

impl SeededRandomGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for SeededRandomGenerator {
    fn default() -> Self {
        SeededRandomGenerator::new(DEFAULT_SEED as u64)
    }
}

impl RandomGenerator for SeededRandomGenerator {
    fn next_range(&mut self, from: usize, to: usize) -> usize {
        self.rng.random_range(from..to)
    }
}

/// A tiny linear congruential generator. Deterministic across platforms and `rand` versions,
/// which keeps test expectations stable.
#[derive(Debug, Clone)]
pub struct CustomNumberGenerator {
    seed: i64,
}

impl Default for CustomNumberGenerator {
    fn default() -> Self {
        CustomNumberGenerator::new(DEFAULT_SEED)
    }
}

impl RandomGenerator for CustomNumberGenerator {
    fn next_range(&mut self, from: usize, to: usize) -> usize {
        (self.next() as usize % (to - from)) + from
    }
}

impl CustomNumberGenerator {
    /// Any seed is accepted; it is reduced into `0..i32::MAX` first.
    pub const fn new(seed: i64) -> Self {
        Self {
            seed: seed.rem_euclid(MODULUS),
        }
    }

    // The state stays below `MODULUS`, so the product fits in an i64.
    fn next(&mut self) -> u32 {
        self.seed = (self.seed * MULTIPLIER_A + INCREMENT_C) % MODULUS;
        self.seed as u32
    }
}
