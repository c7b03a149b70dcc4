//! Nullable random: scripted draws.

use std::sync::Mutex;

use trustmesh_router::RandomSource;

/// Returns pre-configured draws in order, cycling when exhausted.
///
/// Each draw is reduced modulo the requested bound.
pub struct NullRandom {
    draws: Vec<usize>,
    index: Mutex<usize>,
}

impl NullRandom {
    pub fn new(draws: Vec<usize>) -> Self {
        Self {
            draws,
            index: Mutex::new(0),
        }
    }

    /// Same draw for every call.
    pub fn constant(draw: usize) -> Self {
        Self::new(vec![draw])
    }

    /// Number of draws taken so far.
    pub fn taken(&self) -> usize {
        *self.index.lock().unwrap()
    }
}

impl RandomSource for NullRandom {
    fn below(&self, bound: usize) -> usize {
        let mut idx = self.index.lock().unwrap();
        let draw = if self.draws.is_empty() {
            0
        } else {
            self.draws[*idx % self.draws.len()]
        };
        *idx += 1;
        draw % bound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycles_through_script() {
        let random = NullRandom::new(vec![3, 7]);
        assert_eq!(random.below(10), 3);
        assert_eq!(random.below(10), 7);
        assert_eq!(random.below(5), 3);
        assert_eq!(random.taken(), 3);
    }

    #[test]
    fn draws_are_bounded() {
        assert_eq!(NullRandom::constant(12).below(10), 2);
        assert_eq!(NullRandom::new(vec![]).below(4), 0);
    }
}
