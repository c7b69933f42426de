//! Per-attribute transformation statistics
//!
//! Counts how many non-empty values were successfully transformed for each
//! attribute. Counters only ever increase; an attribute with a zero count
//! after a batch either never appeared in the input or failed systematically.

use std::collections::BTreeMap;

/// Monotonic per-attribute counters
#[derive(Debug, Clone, Default)]
pub struct StatsCollector {
    counts: BTreeMap<String, u64>,
}

impl StatsCollector {
    /// Create an empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one transformed value for an attribute
    pub fn increment(&mut self, key: &str) {
        *self.counts.entry(key.to_string()).or_insert(0) += 1;
    }

    /// Count for one attribute (zero when never recorded)
    pub fn get(&self, key: &str) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Borrow the counters
    pub fn snapshot(&self) -> &BTreeMap<String, u64> {
        &self.counts
    }

    /// Reset all counters
    pub fn clear(&mut self) {
        self.counts.clear();
    }

    /// Check whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_and_get() {
        let mut stats = StatsCollector::new();
        assert_eq!(stats.get("name"), 0);
        stats.increment("name");
        assert_eq!(stats.get("name"), 1);
        stats.increment("name");
        stats.increment("phone");
        assert_eq!(stats.get("name"), 2);
        assert_eq!(stats.get("phone"), 1);
    }

    #[test]
    fn test_clear() {
        let mut stats = StatsCollector::new();
        stats.increment("name");
        stats.clear();
        assert!(stats.is_empty());
        assert_eq!(stats.get("name"), 0);
    }
}
