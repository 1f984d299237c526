// SPDX-License-Identifier: BUSL-1.1

//! Ref-count garbage collection over the `PersistImageStatus` table
//! (spec §4.F "Garbage collection").

use std::collections::HashMap;

use eve_types::PersistImageStatus;

/// Sweep every entry, marking `Expired=true` where `RefCount==0` for
/// longer than `download_gc_time_s`. Returns the shas newly marked expired
/// this sweep, so the caller can kick off the owning client's config
/// deletion (spec: "triggers the owning client to delete its Config").
///
/// The GC timer itself (`DownloadGCTime/10`, gated on the
/// AssignableAdapters subsystem being initialized) is the caller's
/// responsibility to schedule; this function is the per-tick sweep.
pub fn sweep(
    statuses: &mut HashMap<String, PersistImageStatus>,
    now_ms: u64,
    download_gc_time_s: u64,
) -> Vec<String> {
    let mut newly_expired = Vec::new();
    for (sha, status) in statuses.iter_mut() {
        let was_expired = status.expired;
        status.gc_tick(now_ms, download_gc_time_s);
        if status.expired && !was_expired {
            newly_expired.push(sha.clone());
        }
    }
    newly_expired
}

#[cfg(test)]
#[path = "gc_tests.rs"]
mod tests;
