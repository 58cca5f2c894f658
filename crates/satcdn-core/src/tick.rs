// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated time and the fixed-delta tick loop.

use std::sync::Arc;

use crate::provider::CdnProvider;
use crate::requester::Requester;

/// A simulated instant. Supports `+Δseconds` and total ordering; time
/// advances monotonically within a run.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct SimTime(f64);

impl SimTime {
    pub fn from_secs(secs: f64) -> Self {
        Self(secs)
    }

    pub fn as_secs(&self) -> f64 {
        self.0
    }

    pub fn advance(self, delta_secs: f64) -> Self {
        Self(self.0 + delta_secs)
    }
}

/// Drives simulated time forward by a fixed delta, running every
/// requester's `send_requests` (P1) before any satellite's `post_epoch`
/// hook (P2). Requesters within P1 run on separate worker threads via a
/// scoped thread-pool (`crossbeam::scope`).
pub struct TickDriver {
    start: SimTime,
    end: SimTime,
    delta_secs: f64,
    requesters: Vec<Requester>,
    satellites: Vec<Arc<CdnProvider>>,
}

impl TickDriver {
    pub fn new(
        start: SimTime,
        end: SimTime,
        delta_secs: f64,
        requesters: Vec<Requester>,
        satellites: Vec<Arc<CdnProvider>>,
    ) -> Self {
        Self {
            start,
            end,
            delta_secs,
            requesters,
            satellites,
        }
    }

    /// Runs the fixed-Δ loop to completion. Returns `Err` immediately if any
    /// tick's sanity invariant fails — a `SanityError` aborts the run.
    pub fn run(&mut self) -> Result<(), crate::error::SanityError> {
        let mut t = self.start;
        while t <= self.end {
            t = t.advance(self.delta_secs);

            let requesters = &mut self.requesters;
            let result: Result<(), crate::error::SanityError> = crossbeam::scope(|scope| {
                let mut handles = Vec::with_capacity(requesters.len());
                for r in requesters.iter_mut() {
                    handles.push(scope.spawn(move |_| r.send_requests(t)));
                }
                for h in handles {
                    h.join().expect("requester thread panicked")?;
                }
                Ok(())
            })
            .expect("tick scope panicked");
            result?;

            for sat in &self.satellites {
                sat.post_epoch();
            }
        }
        Ok(())
    }
}
