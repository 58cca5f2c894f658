// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structured telemetry sink.
//!
//! A global singleton, set once at startup (`init`): a single `Output`
//! behind a mutex, with a level-less "always emit" contract since every
//! telemetry line here is a structured event, not a severity-leveled log
//! message.

pub mod output;

use std::sync::{Arc, OnceLock};

use output::Output;

use crate::ids::{ContentId, SatelliteId};
use crate::tick::SimTime;

static TELEMETRY: OnceLock<Telemetry> = OnceLock::new();

pub struct Telemetry {
    output: Arc<dyn Output>,
}

impl Telemetry {
    pub fn init(output: Arc<dyn Output>) -> &'static Telemetry {
        TELEMETRY.get_or_init(|| Telemetry { output })
    }

    /// Returns the global sink, falling back to stdout if `init` was never
    /// called (useful for unit tests that don't wire a scenario).
    pub fn global() -> &'static Telemetry {
        TELEMETRY.get_or_init(|| Telemetry {
            output: Arc::new(output::ConsoleOutput),
        })
    }

    fn emit(&self, line: String) {
        if let Err(e) = self.output.write_line(&line) {
            log::warn!("telemetry write failed: {e}");
        }
    }

    /// `[Traffic Monitor]:[downlinkCnt, uplinkCnt, islNext, islPrev, islLeft, islRight]`
    pub fn traffic_monitor(&self, downlink: u64, uplink: u64, isl: [u64; 4]) {
        self.emit(format!(
            "[Traffic Monitor]:[{}, {}, {}, {}, {}, {}]",
            downlink, uplink, isl[0], isl[1], isl[2], isl[3]
        ));
    }

    /// `[Missed but available]N,ids,islHops,distances,shortestHops`, or a
    /// plain "No remote hit" line when the batch had none.
    pub fn missed_but_available(
        &self,
        ids: &[ContentId],
        isl_hops: &[Option<u32>],
        distances: &[f64],
        shortest_hops: &[Option<u32>],
    ) {
        if ids.is_empty() {
            self.emit("No remote hit".to_string());
            return;
        }
        self.emit(format!(
            "[Missed but available]{},{:?},{:?},{:?},{:?}",
            ids.len(),
            ids.iter().map(ContentId::as_str).collect::<Vec<_>>(),
            isl_hops,
            distances,
            shortest_hops
        ));
    }

    /// `[Cache content]orderedIDs`
    pub fn cache_content(&self, ordered_ids: &[ContentId]) {
        self.emit(format!(
            "[Cache content]{:?}",
            ordered_ids.iter().map(ContentId::as_str).collect::<Vec<_>>()
        ));
    }

    /// `[Hit rate]:satID,float`
    pub fn hit_rate(&self, sat: SatelliteId, rate: f64) {
        self.emit(format!("[Hit rate]:{sat},{rate}"));
    }

    /// `[Request Result]:satID, [bool,...]`
    pub fn request_result(&self, sat: SatelliteId, hits: &[bool]) {
        self.emit(format!("[Request Result]:{sat}, {hits:?}"));
    }

    /// Out-of-service warning — recovered locally by the requester, never
    /// surfaced as an `Err`.
    pub fn out_of_service(&self, requester: &str, t: SimTime) {
        log::warn!("[{requester}] out of service at t={}", t.as_secs());
    }
}
