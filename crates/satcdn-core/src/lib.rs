// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # satcdn-core
//!
//! Discrete-event core for a satellite-borne content-delivery network
//! simulator: a per-satellite bounded cache with pluggable eviction, a
//! constellation-wide replica directory under concurrent mutation, an ISL
//! topology with a shortest-replica resolver, a request generator and
//! load-balanced scheduler, and the fixed-delta tick loop that drives all
//! of it.
//!
//! Orbital propagation, elevation-angle geometry, and scenario wiring are
//! named external interfaces (see [`position`] and [`fov`]) — this crate
//! models the routing/caching/consistency engine around them, not the
//! physics.

pub mod access;
pub mod cache;
pub mod directory;
pub mod error;
pub mod fov;
pub mod ids;
pub mod isl;
pub mod position;
pub mod provider;
pub mod requester;
pub mod scheduler;
pub mod telemetry;
pub mod tick;
pub mod topology;

pub use cache::eviction::{CacheEvictionStrategy, EvictionPolicy, LruEvictionPolicy};
pub use cache::CacheEngine;
pub use directory::ReplicaDirectory;
pub use error::{ConfigError, OutOfService, SanityError, TopologyError, UnknownApiError};
pub use fov::{FovService, GroundLocation};
pub use ids::{ContentId, SatelliteId};
pub use isl::IslGraph;
pub use position::{Position, PositionOracle};
pub use provider::{CdnProvider, DEFAULT_HOP_TO_CHECK};
pub use requester::{Requester, RequesterConfig};
pub use scheduler::{Scheduler, DEFAULT_MIN_ELEVATION_DEG};
pub use telemetry::Telemetry;
pub use tick::{SimTime, TickDriver};
pub use topology::Topology;
