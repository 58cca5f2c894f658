// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A named topology: the shared replica directory, ISL graph, and the
//! satellites that belong to it.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;

use crate::directory::ReplicaDirectory;
use crate::error::TopologyError;
use crate::ids::SatelliteId;
use crate::isl::{IslGraph, Neighbors};
use crate::provider::CdnProvider;

/// Read-mostly registry of satellites in a topology. `DashMap` gives
/// lock-free concurrent lookups once construction is done.
pub struct Topology {
    pub name: String,
    pub id: u32,
    pub directory: Arc<ReplicaDirectory>,
    pub isl: Arc<IslGraph>,
    satellites: DashMap<SatelliteId, Arc<CdnProvider>>,
}

impl Topology {
    pub fn new(name: String, id: u32, adjacency: HashMap<SatelliteId, Neighbors>) -> Self {
        Self {
            name,
            id,
            directory: Arc::new(ReplicaDirectory::new()),
            isl: Arc::new(IslGraph::new(adjacency)),
            satellites: DashMap::new(),
        }
    }

    pub fn add_satellite(&self, provider: Arc<CdnProvider>) -> Result<(), TopologyError> {
        let id = provider.id();
        if self.satellites.contains_key(&id) {
            return Err(TopologyError::DuplicateNodeId(id, self.name.clone()));
        }
        self.satellites.insert(id, provider);
        Ok(())
    }

    pub fn satellite(&self, id: SatelliteId) -> Option<Arc<CdnProvider>> {
        self.satellites.get(&id).map(|e| e.value().clone())
    }

    pub fn satellites(&self) -> Vec<Arc<CdnProvider>> {
        self.satellites.iter().map(|e| e.value().clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::eviction::LruEvictionPolicy;
    use crate::cache::CacheEngine;
    use crate::position::StaticPositionOracle;

    #[test]
    fn duplicate_node_id_is_rejected() {
        let topo = Topology::new("t".into(), 0, HashMap::new());
        let positions = Arc::new(StaticPositionOracle::new(HashMap::new()));
        let make = || {
            Arc::new(CdnProvider::new(
                1,
                CacheEngine::new(4, Box::new(LruEvictionPolicy)),
                topo.directory.clone(),
                topo.isl.clone(),
                positions.clone(),
                1,
            ))
        };
        topo.add_satellite(make()).unwrap();
        assert!(topo.add_satellite(make()).is_err());
    }
}
