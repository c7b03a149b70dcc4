//! Bounded sampling of relay targets.
//!
//! Selection draws `d` uniformly from `0..SELECTION_SPAN` and picks index
//! `max(d - (SELECTION_SPAN - n) - i, 0)` on the i-th pick, where `n` is the
//! pool size before sampling started. The draw is therefore shifted towards
//! the head of the pool:
//!
//! - for `n <= SELECTION_SPAN` the head is favoured, heavily so for small
//!   pools (with `n = 3` the first item is picked 8 times out of 10);
//! - for `n > SELECTION_SPAN` only the last `SELECTION_SPAN` items of the
//!   remaining pool can ever be picked.
//!
//! Directory implementations return up peers in random order, which is what
//! makes the result look random from the outside.

use crate::random::RandomSource;

/// Width of the random draw behind [`selection_index`].
pub const SELECTION_SPAN: usize = 10;

/// Per-class caps for one relay of one document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FanoutCaps {
    pub members: usize,
    pub nonmembers: usize,
}

/// Index picked on the `pick`-th round from a pool that had `pool_len`
/// items at the start, given a draw in `0..SELECTION_SPAN`.
///
/// Always a valid index into the remaining `pool_len - pick` items.
pub fn selection_index(draw: usize, pool_len: usize, pick: usize) -> usize {
    (draw + pool_len).saturating_sub(SELECTION_SPAN + pick)
}

/// Take up to `max` distinct items out of `pool`, without replacement.
pub fn choose_x_in<T>(mut pool: Vec<T>, max: usize, random: &dyn RandomSource) -> Vec<T> {
    let pool_len = pool.len();
    let picks = pool_len.min(max);
    let mut chosen = Vec::with_capacity(picks);
    for pick in 0..picks {
        let index = selection_index(random.below(SELECTION_SPAN), pool_len, pick);
        chosen.push(pool.remove(index));
    }
    chosen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SeededRandom;

    struct Fixed(usize);

    impl RandomSource for Fixed {
        fn below(&self, bound: usize) -> usize {
            self.0.min(bound - 1)
        }
    }

    #[test]
    fn index_never_exceeds_remaining_pool() {
        for pool_len in 1..30 {
            for pick in 0..pool_len {
                for draw in 0..SELECTION_SPAN {
                    assert!(selection_index(draw, pool_len, pick) < pool_len - pick);
                }
            }
        }
    }

    #[test]
    fn small_pools_favour_the_head() {
        let head_hits = (0..SELECTION_SPAN)
            .filter(|&d| selection_index(d, 3, 0) == 0)
            .count();
        assert_eq!(head_hits, 8);
    }

    #[test]
    fn large_pools_only_reach_the_tail() {
        let reachable: Vec<usize> = (0..SELECTION_SPAN)
            .map(|d| selection_index(d, 25, 0))
            .collect();
        assert_eq!(reachable.first(), Some(&15));
        assert_eq!(reachable.last(), Some(&24));
    }

    #[test]
    fn full_pool_with_minimum_draw_keeps_order() {
        let chosen = choose_x_in(vec!['a', 'b', 'c'], 3, &Fixed(0));
        assert_eq!(chosen, vec!['a', 'b', 'c']);
    }

    #[test]
    fn maximum_draw_on_full_span_pool_takes_the_tail() {
        let pool: Vec<usize> = (0..SELECTION_SPAN).collect();
        let chosen = choose_x_in(pool, 3, &Fixed(9));
        assert_eq!(chosen, vec![9, 8, 7]);
    }

    #[test]
    fn respects_cap_and_never_repeats() {
        let random = SeededRandom::new(3);
        for n in 0..25 {
            for max in 0..12 {
                let pool: Vec<usize> = (0..n).collect();
                let mut chosen = choose_x_in(pool, max, &random);
                assert_eq!(chosen.len(), n.min(max));
                chosen.sort_unstable();
                chosen.dedup();
                assert_eq!(chosen.len(), n.min(max));
                assert!(chosen.iter().all(|&x| x < n));
            }
        }
    }
}
