// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The message published from Entry to a Worker's queue.

use crate::{CorrelationId, ExecutionRequest};
use serde::{Deserialize, Serialize};

/// One execution unit submitted from Entry to a Worker.
///
/// Owned by the broker until delivered; correlation ids are unique per
/// dispatched job and are never supplied by the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub correlation_id: CorrelationId,
    pub request: ExecutionRequest,
}

/// Best-effort extraction of `correlation_id` from a job body that failed
/// to deserialize as a whole [`Job`]. Lets the Worker answer a malformed
/// request's own correlation id with a `Failed` reply instead of dropping
/// it silently.
pub fn peek_correlation_id(bytes: &[u8]) -> Option<CorrelationId> {
    #[derive(Deserialize)]
    struct Peek {
        correlation_id: CorrelationId,
    }
    serde_json::from_slice::<Peek>(bytes).ok().map(|p| p.correlation_id)
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
