// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Identifier types shared across the simulator core.

use std::fmt;
use std::sync::Arc;

/// Opaque content identifier. Equality is exact string equality; the only
/// supported operations are set membership and ordering.
#[derive(Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ContentId(Arc<str>);

impl ContentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ContentId {
    fn from(s: &str) -> Self {
        Self(Arc::from(s))
    }
}

impl From<String> for ContentId {
    fn from(s: String) -> Self {
        Self(Arc::from(s.as_str()))
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

/// Non-negative integer identifying a satellite, unique within a topology.
pub type SatelliteId = u32;
