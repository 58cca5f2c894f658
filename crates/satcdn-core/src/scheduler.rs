// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Largest-elevation, load-balanced satellite scheduler.

use crate::fov::{FovService, GroundLocation};
use crate::ids::SatelliteId;
use crate::tick::SimTime;

/// Default minimum elevation angle, in degrees, above which a satellite is
/// considered visible to a ground requester.
pub const DEFAULT_MIN_ELEVATION_DEG: f64 = 25.0;

pub struct Scheduler<'a> {
    fov: &'a dyn FovService,
    min_elevation_deg: f64,
}

impl<'a> Scheduler<'a> {
    pub fn new(fov: &'a dyn FovService) -> Self {
        Self {
            fov,
            min_elevation_deg: DEFAULT_MIN_ELEVATION_DEG,
        }
    }

    pub fn with_min_elevation(mut self, min_elevation_deg: f64) -> Self {
        self.min_elevation_deg = min_elevation_deg;
        self
    }

    /// Returns up to `n` satellites visible above the elevation threshold,
    /// ordered by increasing elevation (ties broken by discovery order) —
    /// matching the original `argsort` + tail-slice. Empty means "out of
    /// service".
    pub fn schedule(&self, location: GroundLocation, t: SimTime, n: usize) -> Vec<SatelliteId> {
        let mut visible = self.fov.visible_satellites(location, t, self.min_elevation_deg);
        if visible.is_empty() {
            return Vec::new();
        }
        visible.sort_by(|a, b| a.1.total_cmp(&b.1));
        let take = n.min(visible.len());
        visible[visible.len() - take..]
            .iter()
            .map(|(id, _)| *id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn empty_fov_is_out_of_service() {
        let fov = crate::fov::StaticFovService::new(HashMap::new());
        let sched = Scheduler::new(&fov);
        let loc = GroundLocation { lat: 0.0, lon: 0.0, alt: 0.0 };
        assert!(sched.schedule(loc, SimTime::from_secs(0.0), 3).is_empty());
    }

    #[test]
    fn takes_highest_elevation_first() {
        let mut elevations = HashMap::new();
        elevations.insert(1, 30.0);
        elevations.insert(2, 80.0);
        elevations.insert(3, 45.0);
        let fov = crate::fov::StaticFovService::new(elevations);
        let sched = Scheduler::new(&fov);
        let loc = GroundLocation { lat: 0.0, lon: 0.0, alt: 0.0 };
        let picked = sched.schedule(loc, SimTime::from_secs(0.0), 2);
        assert_eq!(picked, vec![3, 2]);
    }
}
