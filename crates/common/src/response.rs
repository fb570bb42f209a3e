// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reply-side types: what a Worker publishes, and what Entry returns.

use crate::{CorrelationId, ProcessResult};
use serde::{Deserialize, Serialize};

/// Compile-then-run outcome of one [`crate::Job`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkerResponse {
    #[serde(default)]
    pub compile: ProcessResult,
    #[serde(default)]
    pub run: ProcessResult,
}

impl WorkerResponse {
    /// `true` iff every phase that actually ran exited zero (a skipped
    /// phase is zero-valued and counts as exit 0).
    pub fn all_succeeded(&self) -> bool {
        self.compile.succeeded() && self.run.succeeded()
    }

    /// `true` iff some executed phase has a non-zero exit.
    pub fn any_failed(&self) -> bool {
        !self.all_succeeded()
    }
}

/// What a Worker publishes to the shared `"reply"` queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyEnvelope {
    pub correlation_id: CorrelationId,
    pub response: WorkerResponse,
}

/// Client-visible status of a completed `execute` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Both phases (those actually run) exited 0.
    Successful,
    /// Some executed phase exited non-zero.
    Error,
    /// Infrastructure failure surfaced by Entry (transport, protocol,
    /// dispatch deadline); never set by the sandbox itself.
    Failed,
}

/// The body Entry returns for `POST /api/v1/execute`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseTask {
    pub status: Status,
    pub output: WorkerResponse,
}

impl ResponseTask {
    /// Build the task from a completed worker round trip.
    pub fn from_response(response: WorkerResponse) -> Self {
        let status = if response.all_succeeded() {
            Status::Successful
        } else {
            Status::Error
        };
        Self { status, output: response }
    }

    /// Build the task for an infrastructure failure: dispatch, directory,
    /// or broker errors that never reached a worker, or a dispatch
    /// deadline that was never answered.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: Status::Failed,
            output: WorkerResponse {
                compile: ProcessResult::infra_failure(message),
                run: ProcessResult::skipped(),
            },
        }
    }
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
