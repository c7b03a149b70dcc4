//! Named event counters.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};

/// A fixed set of thread-safe counters, declared up front.
///
/// Unknown names are ignored on write and read as zero.
#[derive(Debug)]
pub struct StatsCounter {
    counters: HashMap<&'static str, AtomicU64>,
}

impl StatsCounter {
    pub fn new(names: &[&'static str]) -> Self {
        let counters = names.iter().map(|&name| (name, AtomicU64::new(0))).collect();
        Self { counters }
    }

    pub fn increment(&self, name: &str) {
        self.add(name, 1);
    }

    pub fn add(&self, name: &str, value: u64) {
        if let Some(counter) = self.counters.get(name) {
            counter.fetch_add(value, Ordering::Relaxed);
        }
    }

    pub fn get(&self, name: &str) -> u64 {
        self.counters
            .get(name)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Current values, ordered by name.
    pub fn snapshot(&self) -> BTreeMap<&'static str, u64> {
        self.counters
            .iter()
            .map(|(&k, v)| (k, v.load(Ordering::Relaxed)))
            .collect()
    }

    pub fn reset(&self) {
        for counter in self.counters.values() {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_declared_names_only() {
        let stats = StatsCounter::new(&["routed", "dropped"]);
        stats.increment("routed");
        stats.add("routed", 2);
        stats.increment("unknown");
        assert_eq!(stats.get("routed"), 3);
        assert_eq!(stats.get("dropped"), 0);
        assert_eq!(stats.get("unknown"), 0);
    }

    #[test]
    fn snapshot_is_ordered_and_reset_clears() {
        let stats = StatsCounter::new(&["b", "a"]);
        stats.increment("b");
        let snapshot: Vec<_> = stats.snapshot().into_iter().collect();
        assert_eq!(snapshot, vec![("a", 0), ("b", 1)]);
        stats.reset();
        assert_eq!(stats.get("b"), 0);
    }
}
