// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-ground-site requester.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::access::AccessGenerator;
use crate::error::SanityError;
use crate::fov::{FovService, GroundLocation};
use crate::ids::ContentId;
use crate::provider::CdnProvider;
use crate::scheduler::Scheduler;
use crate::telemetry::Telemetry;
use crate::tick::SimTime;

pub struct RequesterConfig {
    pub name: String,
    pub location: GroundLocation,
    pub num_requests: usize,
    pub load_balance_count: usize,
    pub hop_to_check: u32,
    pub pattern: Vec<(ContentId, f64)>,
    /// Per-position probability that a sampled request is replaced by
    /// one-hitter noise. 0.0 disables it.
    pub prob_one_hitter: f64,
}

pub struct Requester {
    config: RequesterConfig,
    access: AccessGenerator,
    fov: Arc<dyn FovService>,
    satellites: Vec<Arc<CdnProvider>>,
    rng: StdRng,
}

impl Requester {
    pub fn new(
        config: RequesterConfig,
        fov: Arc<dyn FovService>,
        satellites: Vec<Arc<CdnProvider>>,
        seed: u64,
    ) -> Self {
        let access = AccessGenerator::new(&config.pattern, config.prob_one_hitter);
        Self {
            config,
            access,
            fov,
            satellites,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generates a batch, schedules satellites, splits the batch across
    /// them in near-equal contiguous chunks, and dispatches each chunk.
    /// Out-of-service ticks log a warning and return without dispatching.
    pub fn send_requests(&mut self, t: SimTime) -> Result<(), SanityError> {
        let requests = self.access.generate(self.config.num_requests, &mut self.rng);

        let sched = Scheduler::new(self.fov.as_ref());
        let selected_ids = sched.schedule(self.config.location, t, self.config.load_balance_count);

        if selected_ids.is_empty() {
            Telemetry::global().out_of_service(&self.config.name, t);
            return Ok(());
        }

        let selected: Vec<&Arc<CdnProvider>> = selected_ids
            .iter()
            .filter_map(|id| self.satellites.iter().find(|s| s.id() == *id))
            .collect();

        for (chunk, sat) in split_evenly(&requests, selected.len())
            .into_iter()
            .zip(selected.iter())
        {
            sat.handle_requests(&chunk, t)?;
        }
        Ok(())
    }
}

/// Splits `items` into `n` contiguous chunks whose sizes differ by at most
/// 1, with earlier chunks getting the extra element.
fn split_evenly(items: &[ContentId], n: usize) -> Vec<Vec<ContentId>> {
    if n == 0 {
        return Vec::new();
    }
    let base = items.len() / n;
    let remainder = items.len() % n;
    let mut chunks = Vec::with_capacity(n);
    let mut idx = 0;
    for i in 0..n {
        let size = base + usize::from(i < remainder);
        chunks.push(items[idx..idx + size].to_vec());
        idx += size;
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    /// S6 — Load-balanced split: 3 satellites, 10 requests -> [4,3,3].
    #[test]
    fn s6_load_balanced_split() {
        let items: Vec<ContentId> = (0..10).map(|i| i.to_string().into()).collect();
        let chunks = split_evenly(&items, 3);
        let sizes: Vec<usize> = chunks.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![4, 3, 3]);
    }
}
