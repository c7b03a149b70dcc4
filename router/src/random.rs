//! Randomness used by peer sampling.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of the bounded draws used by [`choose_x_in`](crate::choose_x_in).
pub trait RandomSource: Send + Sync {
    /// A value in `0..bound`. `bound` is never zero.
    fn below(&self, bound: usize) -> usize;
}

/// Draws from the thread-local generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn below(&self, bound: usize) -> usize {
        rand::thread_rng().gen_range(0..bound)
    }
}

/// Reproducible draws from a fixed seed.
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn below(&self, bound: usize) -> usize {
        match self.rng.lock() {
            Ok(mut rng) => rng.gen_range(0..bound),
            Err(poisoned) => poisoned.into_inner().gen_range(0..bound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_stay_in_bounds() {
        let seeded = SeededRandom::new(7);
        for bound in 1..20 {
            assert!(ThreadRandom.below(bound) < bound);
            assert!(seeded.below(bound) < bound);
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let a = SeededRandom::new(42);
        let b = SeededRandom::new(42);
        let xs: Vec<usize> = (0..16).map(|_| a.below(10)).collect();
        let ys: Vec<usize> = (0..16).map(|_| b.below(10)).collect();
        assert_eq!(xs, ys);
    }
}
