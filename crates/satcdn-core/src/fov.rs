// SPDX-License-Identifier: Apache-2.0 OR MIT

//! External field-of-view collaborator. Elevation-angle geometry itself is
//! out of scope; only the interface the `Scheduler` consumes is modeled
//! here.

use crate::ids::SatelliteId;
use crate::tick::SimTime;

/// A ground location (lat/lon/alt), used only to key FoV queries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundLocation {
    pub lat: f64,
    pub lon: f64,
    pub alt: f64,
}

/// Returns the satellites visible from a ground location above a minimum
/// elevation, as `(satelliteID, elevationDegrees)` pairs.
pub trait FovService: Send + Sync {
    fn visible_satellites(
        &self,
        location: GroundLocation,
        t: SimTime,
        min_elevation_deg: f64,
    ) -> Vec<(SatelliteId, f64)>;
}

/// A fixture FoV service backed by a static position oracle: every
/// satellite with `z > 0` is "visible" at an elevation proportional to its
/// distance rank. Useful for deterministic tests only.
pub struct StaticFovService {
    elevations: std::collections::HashMap<SatelliteId, f64>,
}

impl StaticFovService {
    pub fn new(elevations: std::collections::HashMap<SatelliteId, f64>) -> Self {
        Self { elevations }
    }
}

impl FovService for StaticFovService {
    fn visible_satellites(
        &self,
        _location: GroundLocation,
        _t: SimTime,
        min_elevation_deg: f64,
    ) -> Vec<(SatelliteId, f64)> {
        self.elevations
            .iter()
            .filter(|(_, &e)| e >= min_elevation_deg)
            .map(|(&id, &e)| (id, e))
            .collect()
    }
}

