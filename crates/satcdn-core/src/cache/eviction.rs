// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pluggable eviction policy.
//!
//! The policy is resolved once, at `CdnProvider` construction, from a
//! `CacheEvictionStrategy` variant parsed out of the scenario config —
//! never by string lookup on the hot path.

use lru::LruCache;

use crate::ids::ContentId;

/// The backing recency-ordered store a policy operates over. Wraps
/// `lru::LruCache`, giving O(1) touch/admit/evict instead of relying on a
/// bare insertion-ordered map.
pub(crate) type RecencyStore = LruCache<ContentId, ()>;

/// A pluggable cache eviction policy.
///
/// `evict` is given read/modify access to the cache's recency order and
/// must remove exactly one entry, returning the removed key. The policy
/// itself is stateless across calls — all state lives in the store's
/// ordering.
pub trait EvictionPolicy: Send + Sync {
    fn evict(&self, store: &mut RecencyStore) -> Option<ContentId>;
}

/// Remove the oldest (least-recently-touched) entry.
#[derive(Debug, Default, Clone, Copy)]
pub struct LruEvictionPolicy;

impl EvictionPolicy for LruEvictionPolicy {
    fn evict(&self, store: &mut RecencyStore) -> Option<ContentId> {
        store.pop_lru().map(|(key, ())| key)
    }
}

/// Resolved eviction strategy, parsed once out of config: a sealed set of
/// variants instead of a string-keyed dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CacheEvictionStrategy {
    Lru,
}

impl CacheEvictionStrategy {
    pub fn build(self) -> Box<dyn EvictionPolicy> {
        match self {
            Self::Lru => Box::new(LruEvictionPolicy),
        }
    }
}
