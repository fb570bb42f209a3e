// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Directory entry for one live worker.

use crate::WorkerId;
use serde::{Deserialize, Serialize};

/// `{id, cpu_usage, last_updated_ms}` as stored under `worker:<uuid>`.
///
/// Mutated only by the owning worker (heartbeat); any caller may read.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkerRecord {
    pub id: WorkerId,
    pub cpu_usage: f64,
    pub last_updated_ms: u64,
}

/// Selection policy (§4.2): minimum `cpu_usage`, ties broken by the
/// lowest `last_updated_ms`. Deterministic given the same snapshot,
/// independent of the snapshot's iteration order.
pub fn pick_best(snapshot: &[WorkerRecord]) -> Option<WorkerRecord> {
    snapshot
        .iter()
        .copied()
        .min_by(|a, b| {
            a.cpu_usage
                .total_cmp(&b.cpu_usage)
                .then(a.last_updated_ms.cmp(&b.last_updated_ms))
        })
}

#[cfg(test)]
#[path = "worker_record_tests.rs"]
mod tests;
