// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Constellation-wide replica directory.
//!
//! An explicit object owned by `Topology`, guarded by a single
//! topology-wide mutex — never a module-level map. All mutation is
//! serialized through this one lock; readers take an owned copy rather than
//! a reference that could outlive the critical section.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::ids::{ContentId, SatelliteId};

#[derive(Default)]
pub struct ReplicaDirectory {
    holders: Mutex<HashMap<ContentId, Vec<SatelliteId>>>,
}

impl ReplicaDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Owned copy of the current holder list. Never a shared reference.
    pub fn holders(&self, id: &ContentId) -> Vec<SatelliteId> {
        self.holders
            .lock()
            .get(id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn has_any_holder(&self, id: &ContentId) -> bool {
        self.holders
            .lock()
            .get(id)
            .is_some_and(|v| !v.is_empty())
    }

    /// Appends `sat` to the holder list, creating the key if absent.
    pub fn add_holder(&self, id: ContentId, sat: SatelliteId) {
        self.holders.lock().entry(id).or_default().push(sat);
    }

    /// Removes the first occurrence of `sat` from the holder list. The key
    /// is retained with an empty list rather than removed entirely —
    /// readers must treat an empty list as "no replicas".
    pub fn remove_holder(&self, id: &ContentId, sat: SatelliteId) {
        if let Some(list) = self.holders.lock().get_mut(id) {
            if let Some(pos) = list.iter().position(|s| *s == sat) {
                list.remove(pos);
            }
        }
    }

    /// Atomically reads the holder list as it stood *before* this call and
    /// appends `sat` as a new holder, all under one lock acquisition. This
    /// is the read-modify-write `CdnProvider` needs on a local miss: the
    /// classification (uplink vs. remote hit) must see a consistent
    /// pre-registration snapshot.
    pub fn consult_and_register(&self, id: &ContentId, sat: SatelliteId) -> Vec<SatelliteId> {
        let mut map = self.holders.lock();
        let existing = map.get(id).cloned().unwrap_or_default();
        map.entry(id.clone()).or_default().push(sat);
        existing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_remove_holder() {
        let dir = ReplicaDirectory::new();
        let v: ContentId = "v".into();
        assert!(!dir.has_any_holder(&v));
        dir.add_holder(v.clone(), 1);
        dir.add_holder(v.clone(), 2);
        assert_eq!(dir.holders(&v), vec![1, 2]);
        dir.remove_holder(&v, 1);
        assert_eq!(dir.holders(&v), vec![2]);
    }

    #[test]
    fn consult_and_register_returns_pre_registration_snapshot() {
        let dir = ReplicaDirectory::new();
        let v: ContentId = "v".into();
        let before = dir.consult_and_register(&v, 1);
        assert!(before.is_empty());
        assert_eq!(dir.holders(&v), vec![1]);
        let before2 = dir.consult_and_register(&v, 2);
        assert_eq!(before2, vec![1]);
        assert_eq!(dir.holders(&v), vec![1, 2]);
    }

    #[test]
    fn empty_collection_after_full_removal_means_no_holders() {
        let dir = ReplicaDirectory::new();
        let k: ContentId = "k".into();
        dir.add_holder(k.clone(), 7);
        dir.remove_holder(&k, 7);
        assert!(dir.holders(&k).is_empty());
        assert!(!dir.has_any_holder(&k));
    }
}
