// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-satellite bounded cache.
//!
//! `CacheEngine` stores presence only — no payload — in recency order. It
//! is not internally synchronized: callers (`CdnProvider`) serialize access
//! via the provider's own mutex.

pub mod eviction;

use std::num::NonZeroUsize;

use eviction::{EvictionPolicy, RecencyStore};

use crate::ids::ContentId;

pub struct CacheEngine {
    capacity: usize,
    store: RecencyStore,
    policy: Box<dyn EvictionPolicy>,
}

impl CacheEngine {
    pub fn new(capacity: usize, policy: Box<dyn EvictionPolicy>) -> Self {
        let cap = NonZeroUsize::new(capacity.max(1))
            .expect("cache capacity coerced to at least 1 above");
        Self {
            capacity,
            store: RecencyStore::new(cap),
            policy,
        }
    }

    /// Returns whether `id` was present; if so, promotes it to most-recent.
    pub fn touch(&mut self, id: &ContentId) -> bool {
        self.store.get(id).is_some()
    }

    /// Inserts `id` as most-recent. If the cache was at capacity, evicts one
    /// victim first via the configured policy and returns it.
    ///
    /// Not valid to call on an already-present key — callers must `touch`
    /// first and only `admit` on a miss.
    pub fn admit(&mut self, id: ContentId) -> (bool, Option<ContentId>) {
        debug_assert!(
            !self.store.contains(&id),
            "admit() called on a key already present; caller should have touched it instead"
        );
        let evicted = if self.store.len() >= self.capacity {
            self.policy.evict(&mut self.store)
        } else {
            None
        };
        self.store.put(id, ());
        (true, evicted)
    }

    pub fn contains(&self, id: &ContentId) -> bool {
        self.store.contains(id)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Recency order, oldest first — for telemetry's `[Cache content]` line
    /// and the recency-ordering test below.
    pub fn snapshot(&self) -> Vec<ContentId> {
        self.store.iter().map(|(k, ())| k.clone()).rev().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::eviction::LruEvictionPolicy;
    use super::*;

    fn engine(capacity: usize) -> CacheEngine {
        CacheEngine::new(capacity, Box::new(LruEvictionPolicy))
    }

    #[test]
    fn touch_miss_then_admit() {
        let mut c = engine(2);
        assert!(!c.touch(&"x".into()));
        let (admitted, evicted) = c.admit("x".into());
        assert!(admitted);
        assert_eq!(evicted, None);
        assert!(c.touch(&"x".into()));
    }

    #[test]
    fn eviction_on_capacity() {
        let mut c = engine(1);
        c.admit("a".into());
        assert!(!c.touch(&"b".into()));
        let (_, evicted) = c.admit("b".into());
        assert_eq!(evicted, Some("a".into()));
        assert!(c.contains(&"b".into()));
        assert!(!c.contains(&"a".into()));
    }

    /// Sequence [a, b, c, a] on capacity 3 leaves final order
    /// oldest->newest = [b, c, a].
    #[test]
    fn recency_law() {
        let mut c = engine(3);
        for id in ["a", "b", "c"] {
            if !c.touch(&id.into()) {
                c.admit(id.into());
            }
        }
        assert!(c.touch(&"a".into()));
        assert_eq!(
            c.snapshot(),
            vec![ContentId::from("b"), ContentId::from("c"), ContentId::from("a")]
        );
    }
}
