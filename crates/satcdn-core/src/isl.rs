// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Inter-satellite link topology and shortest-replica resolver.
//!
//! Neighbor slots are indexed in the fixed order `next, prev, left, right`.
//! BFS hop distances are memoized by source and protected by their own lock
//! so satellites can query concurrently after the graph is loaded.

use std::collections::{HashMap, VecDeque};

use parking_lot::RwLock;

use crate::ids::SatelliteId;

/// Neighbor tuple in the normative order: next, prev, left, right.
pub type Neighbors = [Option<SatelliteId>; 4];

pub const NEXT: usize = 0;
pub const PREV: usize = 1;
pub const LEFT: usize = 2;
pub const RIGHT: usize = 3;

pub struct IslGraph {
    adjacency: HashMap<SatelliteId, Neighbors>,
    memo: RwLock<HashMap<SatelliteId, HashMap<SatelliteId, u32>>>,
}

impl IslGraph {
    pub fn new(adjacency: HashMap<SatelliteId, Neighbors>) -> Self {
        Self {
            adjacency,
            memo: RwLock::new(HashMap::new()),
        }
    }

    pub fn neighbors(&self, sat: SatelliteId) -> Neighbors {
        self.adjacency.get(&sat).copied().unwrap_or([None; 4])
    }

    /// BFS-based shortest hop distance, memoized by source. `None` means
    /// unreachable ("infinity"); `HopDistance(x, x) == 0`.
    pub fn hop_distance(&self, from: SatelliteId, to: SatelliteId) -> Option<u32> {
        if let Some(dists) = self.memo.read().get(&from) {
            return dists.get(&to).copied();
        }
        let dists = self.bfs_from(from);
        let result = dists.get(&to).copied();
        self.memo.write().insert(from, dists);
        result
    }

    fn bfs_from(&self, source: SatelliteId) -> HashMap<SatelliteId, u32> {
        let mut dist = HashMap::new();
        let mut queue = VecDeque::new();
        dist.insert(source, 0);
        queue.push_back(source);
        while let Some(current) = queue.pop_front() {
            let d = dist[&current];
            for neighbor in self.neighbors(current).into_iter().flatten() {
                if !dist.contains_key(&neighbor) {
                    dist.insert(neighbor, d + 1);
                    queue.push_back(neighbor);
                }
            }
        }
        dist
    }

    /// For each of `holders`, compute the hop distance from `from` and
    /// return the minimum, plus — if that minimum is <= 1 — the
    /// directly-connected neighbor that achieves it, tie-broken in the
    /// fixed order next, prev, left, right.
    ///
    /// Takes the holder list by value rather than re-reading the directory,
    /// so callers must pass the snapshot taken *before* registering
    /// themselves as a holder — otherwise a satellite resolving its own
    /// miss would see itself as an already-registered 0-hop holder.
    pub fn shortest_replica_hop(
        &self,
        from: SatelliteId,
        holders: &[SatelliteId],
    ) -> (Option<u32>, Option<SatelliteId>) {
        let min_hop = holders
            .iter()
            .filter_map(|&h| self.hop_distance(from, h))
            .min();

        let Some(min_hop) = min_hop else {
            return (None, None);
        };
        if min_hop > 1 {
            return (Some(min_hop), None);
        }
        let neighbors = self.neighbors(from);
        let via = neighbors
            .into_iter()
            .flatten()
            .find(|n| holders.contains(n) && self.hop_distance(from, *n) == Some(min_hop));
        (Some(min_hop), via)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(n: u32) -> IslGraph {
        let mut adj = HashMap::new();
        for i in 0..n {
            let next = if i + 1 < n { Some(i + 1) } else { None };
            let prev = if i > 0 { Some(i - 1) } else { None };
            adj.insert(i, [next, prev, None, None]);
        }
        IslGraph::new(adj)
    }

    #[test]
    fn hop_distance_symmetry_and_self() {
        let g = chain(4);
        assert_eq!(g.hop_distance(0, 0), Some(0));
        assert_eq!(g.hop_distance(0, 3), Some(3));
        assert_eq!(g.hop_distance(3, 0), Some(3));
        assert_eq!(g.hop_distance(0, 99), None);
    }

    #[test]
    fn shortest_replica_hop_via_next_neighbor() {
        let g = chain(2);
        let (hops, via) = g.shortest_replica_hop(0, &[1]);
        assert_eq!(hops, Some(1));
        assert_eq!(via, Some(1));
    }

    #[test]
    fn beyond_threshold_has_no_neighbor_tiebreak() {
        let g = chain(5);
        let (hops, via) = g.shortest_replica_hop(0, &[4]);
        assert_eq!(hops, Some(4));
        assert_eq!(via, None);
    }
}
