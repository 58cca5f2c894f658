// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end scenarios not already covered as unit tests next to their
//! owning module.

use std::collections::HashMap;
use std::sync::Arc;

use satcdn_core::cache::eviction::LruEvictionPolicy;
use satcdn_core::fov::StaticFovService;
use satcdn_core::position::StaticPositionOracle;
use satcdn_core::{
    CacheEngine, CdnProvider, ContentId, GroundLocation, IslGraph, ReplicaDirectory, Requester,
    RequesterConfig, SimTime,
};

fn provider(id: u32, capacity: usize, directory: Arc<ReplicaDirectory>, isl: Arc<IslGraph>) -> Arc<CdnProvider> {
    let positions = Arc::new(StaticPositionOracle::new(HashMap::new()));
    Arc::new(CdnProvider::new(
        id,
        CacheEngine::new(capacity, Box::new(LruEvictionPolicy)),
        directory,
        isl,
        positions,
        1,
    ))
}

/// Out of service: FoV returns nothing, requester dispatches no
/// CdnProvider calls.
#[test]
fn s5_out_of_service_dispatches_nothing() {
    let directory = Arc::new(ReplicaDirectory::new());
    let isl = Arc::new(IslGraph::new(HashMap::new()));
    let sat = provider(1, 4, directory.clone(), isl);

    let fov = Arc::new(StaticFovService::new(HashMap::new()));
    let config = RequesterConfig {
        name: "r1".to_string(),
        location: GroundLocation { lat: 0.0, lon: 0.0, alt: 0.0 },
        num_requests: 5,
        load_balance_count: 2,
        hop_to_check: 1,
        pattern: vec![(ContentId::from("a"), 1.0)],
        prob_one_hitter: 0.0,
    };
    let mut requester = Requester::new(config, fov, vec![sat], 1);
    requester.send_requests(SimTime::from_secs(1.0)).unwrap();

    // Nothing was ever dispatched to the satellite, so the directory never
    // learned of any holder for the requester's only pattern key.
    assert!(directory.holders(&ContentId::from("a")).is_empty());
}

/// The holder-presence invariant holds after a batch that produces both an
/// uplink admission and a later eviction.
#[test]
fn holder_presence_invariant_holds_after_eviction() {
    let directory = Arc::new(ReplicaDirectory::new());
    let isl = Arc::new(IslGraph::new(HashMap::from([(1, [None; 4])])));
    let sat = provider(1, 1, directory.clone(), isl);

    sat.handle_requests(&["a".into()], SimTime::from_secs(0.0)).unwrap();
    assert_eq!(directory.holders(&ContentId::from("a")), vec![1]);

    sat.handle_requests(&["b".into()], SimTime::from_secs(1.0)).unwrap();
    assert!(directory.holders(&ContentId::from("a")).is_empty());
    assert_eq!(directory.holders(&ContentId::from("b")), vec![1]);
}

/// ISL distance symmetry and self-distance.
#[test]
fn isl_distance_symmetry() {
    let mut adj = HashMap::new();
    adj.insert(0, [Some(1), None, None, None]);
    adj.insert(1, [Some(2), Some(0), None, None]);
    adj.insert(2, [None, Some(1), None, None]);
    let g = IslGraph::new(adj);
    assert_eq!(g.hop_distance(0, 2), g.hop_distance(2, 0));
    assert_eq!(g.hop_distance(1, 1), Some(0));
}
