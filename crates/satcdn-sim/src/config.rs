// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scenario configuration ingestion.
//!
//! Parses the top-level JSON document (`topologies[]`, each with `nodes[]`
//! and a sibling `simtime`), the ISL-topology file, and access-pattern
//! files: plain `#[derive(Deserialize)]` structs with `#[serde(default =
//! "...")]` for optional fields and an eager `from_file` that surfaces
//! malformed input as a `ConfigError` at load time rather than failing
//! later on the hot path.

use std::collections::HashMap;
use std::path::Path;

use satcdn_core::cache::eviction::CacheEvictionStrategy;
use satcdn_core::isl::Neighbors;
use satcdn_core::ContentId;
use satcdn_core::ConfigError;
use serde::Deserialize;

/// Accepted spellings for "no neighbor in this slot" in the ISL topology
/// file: a numeric sentinel and the common JSON-null conventions.
const NO_NEIGHBOR_SENTINELS: &[&str] = &["-1", "null", "none", "None"];

#[derive(Debug, Deserialize)]
pub struct ScenarioFile {
    pub topologies: Vec<TopologyConfig>,
}

#[derive(Debug, Deserialize)]
pub struct TopologyConfig {
    pub name: String,
    pub id: u32,
    pub nodes: Vec<NodeConfig>,
    pub simtime: SimTimeConfig,
    /// Path to the ISL-topology JSON file for this topology (adjacency of
    /// `"satID" -> [next, prev, left, right]`).
    pub isl_topology_file: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SimTimeConfig {
    pub starttime: String,
    pub endtime: String,
    pub delta: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NodeType {
    Sat,
    Gs,
    #[serde(rename = "IoT")]
    Iot,
    #[serde(rename = "TRAFFIC_SCHEDULER")]
    TrafficScheduler,
}

#[derive(Debug, Deserialize)]
pub struct NodeConfig {
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub nodeid: u32,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    #[serde(default)]
    pub elevation: f64,
    #[serde(default)]
    pub models: Vec<ModelConfig>,
}

/// Tagged by `iname`, the model-kind discriminant used in scenario files.
/// Model kinds this engine doesn't implement (`ModelOrbit`,
/// `ModelHelperFoVWithElevation`, IoT/traffic-scheduler models) fall through
/// to `Unknown` and are ignored — they belong to collaborators this crate
/// only consumes through traits (orbit propagation, FoV geometry) or to
/// node kinds outside this engine's scope.
#[derive(Debug, Deserialize)]
#[serde(tag = "iname")]
pub enum ModelConfig {
    ModelCDNProvider {
        cache_size: usize,
        cache_eviction_strategy: CacheEvictionStrategy,
        handle_requests_strategy: String,
        active_scheduling_strategy: String,
        #[serde(default = "default_hop_to_check")]
        hop_to_check: u32,
    },
    ModelCDNUser {
        access_pattern_file: String,
        access_generation_function: String,
        scheduling_strategy_function: String,
        num_access_to_gen: usize,
        satellites_to_schedule: usize,
        #[serde(default = "default_hop_to_check")]
        hop_to_check: u32,
        #[serde(default)]
        prob_one_hitter: f64,
    },
    #[serde(other)]
    Unknown,
}

fn default_hop_to_check() -> u32 {
    satcdn_core::DEFAULT_HOP_TO_CHECK
}

impl ScenarioFile {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::MalformedJson(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| ConfigError::MalformedJson(e.to_string()))
    }
}

/// Parses an ISL-topology file: `{"satID": [next, prev, left, right], ...}`
/// with entries either a neighbor id string or one of
/// [`NO_NEIGHBOR_SENTINELS`].
pub fn load_isl_topology(path: &Path) -> Result<HashMap<u32, Neighbors>, ConfigError> {
    let text =
        std::fs::read_to_string(path).map_err(|e| ConfigError::MalformedJson(e.to_string()))?;
    let raw: HashMap<String, [String; 4]> =
        serde_json::from_str(&text).map_err(|e| ConfigError::MalformedJson(e.to_string()))?;

    let mut adjacency = HashMap::with_capacity(raw.len());
    for (sat_id, slots) in raw {
        let id: u32 = sat_id
            .parse()
            .map_err(|_| ConfigError::MalformedJson(format!("non-numeric satellite id `{sat_id}`")))?;
        let mut neighbors: Neighbors = [None; 4];
        for (slot, value) in slots.iter().enumerate() {
            if NO_NEIGHBOR_SENTINELS.contains(&value.as_str()) {
                continue;
            }
            neighbors[slot] = Some(value.parse().map_err(|_| {
                ConfigError::MalformedJson(format!("non-numeric neighbor id `{value}`"))
            })?);
        }
        adjacency.insert(id, neighbors);
    }
    Ok(adjacency)
}

/// Parses an access-pattern file: `{"contentID": probability, ...}`.
/// Probabilities must sum to 1 within 1e-6.
pub fn load_access_pattern(path: &Path) -> Result<Vec<(ContentId, f64)>, ConfigError> {
    let text =
        std::fs::read_to_string(path).map_err(|e| ConfigError::MalformedJson(e.to_string()))?;
    let raw: HashMap<String, f64> =
        serde_json::from_str(&text).map_err(|e| ConfigError::MalformedJson(e.to_string()))?;

    let sum: f64 = raw.values().sum();
    if (sum - 1.0).abs() > 1e-6 {
        return Err(ConfigError::ProbabilitiesDoNotSumToOne { sum });
    }
    Ok(raw.into_iter().map(|(k, v)| (ContentId::from(k), v)).collect())
}
