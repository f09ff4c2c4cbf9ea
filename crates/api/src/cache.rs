//! Memoization of seeded simulation outcomes.
//!
//! Only requests carrying a seed are cached: an unseeded request is expected
//! to produce a fresh sample every time.

use quanta_domain::SimulationRequest;
use quanta_simulation::engine::SimulationOutcome;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Identity of a seeded request: its canonical JSON encoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Key for `request`, or `None` if the request is unseeded.
    #[must_use]
    pub fn for_request(request: &SimulationRequest) -> Option<Self> {
        if request.seed.is_none() {
            return None;
        }
        serde_json::to_string(request).ok().map(Self)
    }
}

#[derive(Default)]
struct Entries {
    map: HashMap<CacheKey, Arc<SimulationOutcome>>,
    order: VecDeque<CacheKey>,
}

/// Bounded FIFO cache of simulation outcomes.
///
/// The first value stored under a key wins: concurrent computations of the
/// same seeded request all converge on one shared outcome.
pub struct SimulationCache {
    capacity: usize,
    entries: RwLock<Entries>,
}

impl SimulationCache {
    /// Creates a cache holding at most `capacity` outcomes; 0 disables caching.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: RwLock::new(Entries::default()),
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.map.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Looks up a previously stored outcome.
    pub async fn get(&self, key: &CacheKey) -> Option<Arc<SimulationOutcome>> {
        self.entries.read().await.map.get(key).cloned()
    }

    /// Stores `outcome` unless the key is already present, and returns the
    /// value that is now cached (or `outcome` itself when caching is off).
    pub async fn insert(
        &self,
        key: CacheKey,
        outcome: Arc<SimulationOutcome>,
    ) -> Arc<SimulationOutcome> {
        if self.capacity == 0 {
            return outcome;
        }
        let mut entries = self.entries.write().await;
        if let Some(existing) = entries.map.get(&key) {
            return Arc::clone(existing);
        }
        while entries.order.len() >= self.capacity {
            if let Some(oldest) = entries.order.pop_front() {
                entries.map.remove(&oldest);
                debug!("Evicted cached simulation");
            }
        }
        entries.order.push_back(key.clone());
        entries.map.insert(key, Arc::clone(&outcome));
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quanta_simulation::engine::SimulationEngine;

    fn outcome(seed: u64) -> Arc<SimulationOutcome> {
        let req = SimulationRequest::new("SPY", "Hold", 1, 1_000.0, 5).with_seed(seed);
        Arc::new(SimulationEngine::new().run(&req).unwrap())
    }

    fn key(seed: u64) -> CacheKey {
        CacheKey::for_request(&SimulationRequest::new("SPY", "Hold", 1, 1_000.0, 5).with_seed(seed))
            .unwrap()
    }

    #[test]
    fn test_unseeded_requests_have_no_key() {
        let req = SimulationRequest::new("SPY", "Hold", 1, 1_000.0, 5);
        assert!(CacheKey::for_request(&req).is_none());
        assert_ne!(key(1), key(2));
    }

    #[tokio::test]
    async fn test_first_write_wins() {
        let cache = SimulationCache::new(4);
        let first = outcome(1);
        let second = outcome(1);

        let stored = cache.insert(key(1), Arc::clone(&first)).await;
        assert!(Arc::ptr_eq(&stored, &first));
        let stored = cache.insert(key(1), second).await;
        assert!(Arc::ptr_eq(&stored, &first));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_fifo_eviction() {
        let cache = SimulationCache::new(2);
        for seed in 1..=3 {
            cache.insert(key(seed), outcome(seed)).await;
        }
        assert!(cache.get(&key(1)).await.is_none());
        assert!(cache.get(&key(2)).await.is_some());
        assert!(cache.get(&key(3)).await.is_some());
    }

    #[tokio::test]
    async fn test_zero_capacity_disables() {
        let cache = SimulationCache::new(0);
        cache.insert(key(1), outcome(1)).await;
        assert!(cache.is_empty().await);
    }
}
