// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-satellite glue: `CdnProvider`. This is the system's hot path —
//! it resolves each request against the local cache, then the shared
//! replica directory, then ISL neighbors, falling back to an uplink fetch,
//! and maintains the telemetry counters used to check the batch's hit/miss
//! accounting invariant.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::cache::CacheEngine;
use crate::directory::ReplicaDirectory;
use crate::error::SanityError;
use crate::ids::{ContentId, SatelliteId};
use crate::isl::{IslGraph, LEFT, NEXT, PREV, RIGHT};
use crate::position::PositionOracle;
use crate::telemetry::Telemetry;
use crate::tick::SimTime;

/// Default ISL-hop threshold below which a remote hit is satisfied over
/// ISL rather than falling back to uplink. Configurable per provider;
/// defaults to 1 (only a directly-connected neighbor counts).
pub const DEFAULT_HOP_TO_CHECK: u32 = 1;

struct ProviderState {
    cache: CacheEngine,
    // Last batch's traffic counts, overwritten (not accumulated) on every
    // handle_requests call — what post_epoch reports for the tick.
    downlink_cnt: u64,
    uplink_cnt: u64,
    isl_cnt: [u64; 4],
    hits_lifetime: u64,
    requests_lifetime: u64,
}

pub struct CdnProvider {
    id: SatelliteId,
    state: Mutex<ProviderState>,
    directory: Arc<ReplicaDirectory>,
    isl: Arc<IslGraph>,
    positions: Arc<dyn PositionOracle>,
    hop_to_check: u32,
}

impl CdnProvider {
    pub fn new(
        id: SatelliteId,
        cache: CacheEngine,
        directory: Arc<ReplicaDirectory>,
        isl: Arc<IslGraph>,
        positions: Arc<dyn PositionOracle>,
        hop_to_check: u32,
    ) -> Self {
        Self {
            id,
            state: Mutex::new(ProviderState {
                cache,
                downlink_cnt: 0,
                uplink_cnt: 0,
                isl_cnt: [0; 4],
                hits_lifetime: 0,
                requests_lifetime: 0,
            }),
            directory,
            isl,
            positions,
            hop_to_check,
        }
    }

    pub fn id(&self) -> SatelliteId {
        self.id
    }

    /// Resolves a batch of requests. Executes under the provider's own
    /// mutex (serializing batches targeting this satellite within a tick)
    /// and, for each directory-touching request, under the directory's own
    /// lock — acquired *inside* the provider lock, a fixed ordering
    /// enforced structurally by this function never being reentered.
    pub fn handle_requests(
        &self,
        chunk: &[ContentId],
        t: SimTime,
    ) -> Result<Vec<bool>, SanityError> {
        let mut st = self.state.lock();
        let mut hits = Vec::with_capacity(chunk.len());

        let mut missed_ids = Vec::new();
        let mut missed_isl_hops = Vec::new();
        let mut missed_distances = Vec::new();
        let mut missed_shortest_hops = Vec::new();

        // Batch-local, reset at the top of every call — the sanity
        // invariant below compares counts within this batch, not lifetime
        // cumulative totals.
        let mut downlink_cnt: u64 = 0;
        let mut uplink_cnt: u64 = 0;
        let mut isl_cnt: [u64; 4] = [0; 4];

        for request in chunk {
            if st.cache.touch(request) {
                hits.push(true);
                downlink_cnt += 1;
                continue;
            }

            let existing_holders = self.directory.consult_and_register(request, self.id);
            if existing_holders.is_empty() {
                uplink_cnt += 1;
            } else {
                missed_ids.push(request.clone());

                let closest = existing_holders
                    .iter()
                    .map(|&h| {
                        let d = self
                            .positions
                            .position(self.id, t)
                            .distance(&self.positions.position(h, t));
                        (d, h)
                    })
                    .min_by(|a, b| a.0.total_cmp(&b.0))
                    .expect("existing_holders is non-empty in this branch");
                missed_distances.push(closest.0);
                missed_isl_hops.push(self.isl.hop_distance(self.id, closest.1));

                // Resolved from the pre-registration snapshot held above,
                // not a fresh directory read — self was already registered
                // as a holder by consult_and_register and would otherwise
                // show up as its own 0-hop replica.
                let (shortest_hops, via_neighbor) =
                    self.isl.shortest_replica_hop(self.id, &existing_holders);
                missed_shortest_hops.push(shortest_hops);

                match shortest_hops {
                    Some(h) if h <= self.hop_to_check => {
                        let neighbors = self.isl.neighbors(self.id);
                        let slot = [NEXT, PREV, LEFT, RIGHT]
                            .into_iter()
                            .find(|&i| neighbors[i] == via_neighbor)
                            .expect("shortest_replica_hop only returns a neighbor when h <= 1");
                        isl_cnt[slot] += 1;
                    }
                    _ => uplink_cnt += 1,
                }
            }

            let (_, evicted) = st.cache.admit(request.clone());
            if let Some(evicted) = evicted {
                self.directory.remove_holder(&evicted, self.id);
            }
            hits.push(false);
            downlink_cnt += 1;
        }

        let hit_count = hits.iter().filter(|h| **h).count();
        let expected =
            downlink_cnt as i64 - uplink_cnt as i64 - isl_cnt.iter().sum::<u64>() as i64;
        if hit_count as i64 != expected {
            return Err(SanityError {
                hits: hit_count,
                downlink: downlink_cnt,
                uplink: uplink_cnt,
                isl: isl_cnt,
            });
        }

        st.downlink_cnt = downlink_cnt;
        st.uplink_cnt = uplink_cnt;
        st.isl_cnt = isl_cnt;
        st.hits_lifetime += hit_count as u64;
        st.requests_lifetime += chunk.len() as u64;
        let hit_rate = st.hits_lifetime as f64 / st.requests_lifetime.max(1) as f64;
        let snapshot = st.cache.snapshot();
        drop(st);

        let telemetry = Telemetry::global();
        telemetry.missed_but_available(
            &missed_ids,
            &missed_isl_hops,
            &missed_distances,
            &missed_shortest_hops,
        );
        telemetry.cache_content(&snapshot);
        telemetry.hit_rate(self.id, hit_rate);
        telemetry.request_result(self.id, &hits);

        Ok(hits)
    }

    /// Reserved for per-tick snapshotting; must leave engine state
    /// unchanged.
    pub fn post_epoch(&self) {
        let st = self.state.lock();
        Telemetry::global().traffic_monitor(st.downlink_cnt, st.uplink_cnt, st.isl_cnt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::eviction::LruEvictionPolicy;
    use crate::isl::IslGraph;
    use crate::position::StaticPositionOracle;
    use std::collections::HashMap;

    fn provider(
        id: SatelliteId,
        capacity: usize,
        directory: Arc<ReplicaDirectory>,
        isl: Arc<IslGraph>,
        hop_to_check: u32,
    ) -> CdnProvider {
        let positions = Arc::new(StaticPositionOracle::new(HashMap::new()));
        CdnProvider::new(
            id,
            CacheEngine::new(capacity, Box::new(LruEvictionPolicy)),
            directory,
            isl,
            positions,
            hop_to_check,
        )
    }

    fn lone_satellite_isl() -> Arc<IslGraph> {
        Arc::new(IslGraph::new(HashMap::from([(1, [None; 4])])))
    }

    /// S1 — Cold local hit/miss.
    #[test]
    fn s1_cold_local_hit_miss() {
        let directory = Arc::new(ReplicaDirectory::new());
        let isl = lone_satellite_isl();
        let p = provider(1, 2, directory.clone(), isl, DEFAULT_HOP_TO_CHECK);
        let chunk: Vec<ContentId> = ["x", "y", "x", "z", "y"].iter().map(|s| (*s).into()).collect();
        let hits = p.handle_requests(&chunk, SimTime::from_secs(0.0)).unwrap();
        assert_eq!(hits, vec![false, false, true, false, false]);

        let st = p.state.lock();
        assert_eq!(st.uplink_cnt, 3);
        let snapshot = st.cache.snapshot();
        assert_eq!(snapshot, vec![ContentId::from("z"), ContentId::from("y")]);
        drop(st);

        assert!(directory.holders(&"x".into()).is_empty());
        assert_eq!(directory.holders(&"y".into()), vec![1]);
        assert_eq!(directory.holders(&"z".into()), vec![1]);
    }

    /// S4 — Eviction updates directory.
    #[test]
    fn s4_eviction_updates_directory() {
        let directory = Arc::new(ReplicaDirectory::new());
        let isl = lone_satellite_isl();
        let p = provider(1, 1, directory.clone(), isl, DEFAULT_HOP_TO_CHECK);
        p.handle_requests(&["a".into()], SimTime::from_secs(0.0)).unwrap();
        assert_eq!(directory.holders(&"a".into()), vec![1]);
        p.handle_requests(&["b".into()], SimTime::from_secs(1.0)).unwrap();
        assert!(directory.holders(&"a".into()).is_empty());
        assert_eq!(directory.holders(&"b".into()), vec![1]);
    }

    fn two_satellite_isl() -> Arc<IslGraph> {
        Arc::new(IslGraph::new(HashMap::from([
            (1, [Some(2), None, None, None]),
            (2, [None, Some(1), None, None]),
        ])))
    }

    /// S2 — Remote hit via ISL neighbor.
    #[test]
    fn s2_remote_hit_via_isl_neighbor() {
        let directory = Arc::new(ReplicaDirectory::new());
        directory.add_holder("v".into(), 2);
        let isl = two_satellite_isl();
        let p1 = provider(1, 4, directory.clone(), isl, 1);
        let hits = p1.handle_requests(&["v".into()], SimTime::from_secs(0.0)).unwrap();
        assert_eq!(hits, vec![false]);
        let st = p1.state.lock();
        assert_eq!(st.isl_cnt[NEXT], 1);
        assert_eq!(st.uplink_cnt, 0);
        drop(st);
        assert_eq!(directory.holders(&"v".into()), vec![2, 1]);
    }

    fn chain_isl(n: u32) -> Arc<IslGraph> {
        let mut adj = HashMap::new();
        for i in 0..n {
            let next = if i + 1 < n { Some(i + 1) } else { None };
            let prev = if i > 0 { Some(i - 1) } else { None };
            adj.insert(i, [next, prev, None, None]);
        }
        Arc::new(IslGraph::new(adj))
    }

    /// S3 — Remote hit beyond threshold falls back to uplink.
    #[test]
    fn s3_remote_hit_beyond_threshold_falls_back_to_uplink() {
        let directory = Arc::new(ReplicaDirectory::new());
        directory.add_holder("w".into(), 3);
        let isl = chain_isl(4);
        let p0 = provider(0, 4, directory.clone(), isl, 1);
        p0.handle_requests(&["w".into()], SimTime::from_secs(0.0)).unwrap();
        let st = p0.state.lock();
        assert_eq!(st.uplink_cnt, 1);
        assert_eq!(st.isl_cnt, [0, 0, 0, 0]);
        drop(st);
        assert_eq!(directory.holders(&"w".into()), vec![3, 0]);
    }
}
