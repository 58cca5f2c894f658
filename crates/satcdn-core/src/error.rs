// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error taxonomy.
//!
//! `ConfigError`/`TopologyError` are fatal at startup and propagate to the
//! CLI entry point. `SanityError` is fatal at any point during a run — it
//! signals a design bug in the engine, not a simulated event, and aborts
//! unconditionally. `OutOfService` is recovered locally by the requester
//! and never reaches the caller as an `Err`.

use thiserror::Error;

/// Errors raised while validating a scenario configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("malformed JSON: {0}")]
    MalformedJson(String),

    #[error("access pattern probabilities sum to {sum}, expected 1.0 within 1e-6")]
    ProbabilitiesDoNotSumToOne { sum: f64 },

    #[error("unknown policy name `{0}` for `{1}`")]
    UnknownPolicy(String, &'static str),
}

/// Errors raised while assembling a topology from its node list.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("duplicate node id {0} within topology `{1}`")]
    DuplicateNodeId(crate::ids::SatelliteId, String),

    #[error("unknown satellite id {0} referenced by topology `{1}`")]
    UnknownSatellite(crate::ids::SatelliteId, String),
}

/// A batch hit/miss accounting invariant failed. This always indicates an
/// engine bug, never a simulated condition, so callers should abort the run.
#[derive(Debug, Error)]
#[error(
    "sanity check failed: hits={hits} downlink={downlink} uplink={uplink} isl={isl:?} (expected hits == downlink - uplink - sum(isl))"
)]
pub struct SanityError {
    pub hits: usize,
    pub downlink: u64,
    pub uplink: u64,
    pub isl: [u64; 4],
}

/// A request named an API not present in the provider's closed dispatch
/// table. Logged and recovered; never surfaces as a hard error in practice
/// since the dispatch table is exhaustive over the closed API surface, but
/// is kept as a typed variant for completeness.
#[derive(Debug, Error)]
#[error("unknown API `{0}` requested of satellite {1}")]
pub struct UnknownApiError(pub String, pub crate::ids::SatelliteId);

/// Raised locally by a `Requester` when no satellite is visible above the
/// elevation threshold. Not an error in the `std::error::Error` sense —
/// callers log it as a warning and return without dispatching.
#[derive(Debug, Clone)]
pub struct OutOfService {
    pub requester: String,
}
