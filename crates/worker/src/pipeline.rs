// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-job handling: decode, resolve, execute, reply.
//!
//! Kept free of any broker/directory type so it can be exercised with
//! plain bytes in and a [`ReplyEnvelope`] out.

use lambda_catalog::Catalog;
use lambda_common::{Job, ProcessResult, ReplyEnvelope, WorkerResponse};
use std::path::Path;

/// Handle one raw job body. Returns `None` only when even the
/// correlation id could not be recovered — nothing to reply to, so the
/// caller can only log and drop.
pub async fn handle_job(raw: &[u8], catalog: &Catalog, scratch_root: &Path) -> Option<ReplyEnvelope> {
    let job: Job = match serde_json::from_slice(raw) {
        Ok(job) => job,
        Err(e) => {
            let correlation_id = lambda_common::peek_correlation_id(raw)?;
            tracing::warn!(%correlation_id, error = %e, "failed to decode job body");
            return Some(ReplyEnvelope {
                correlation_id,
                response: infra_failure(format!("malformed job: {e}")),
            });
        }
    };

    let descriptor = match catalog.resolve(&job.request.runtime.name) {
        Some(descriptor) => descriptor,
        None => {
            tracing::info!(correlation_id = %job.correlation_id, runtime = %job.request.runtime.name, "unknown runtime");
            return Some(ReplyEnvelope {
                correlation_id: job.correlation_id,
                response: WorkerResponse {
                    compile: ProcessResult::infra_failure("Language not found"),
                    run: ProcessResult::skipped(),
                },
            });
        }
    };

    let response = lambda_sandbox::execute(&job.request, descriptor, scratch_root).await;
    Some(ReplyEnvelope { correlation_id: job.correlation_id, response })
}

fn infra_failure(message: String) -> WorkerResponse {
    WorkerResponse { compile: ProcessResult::infra_failure(message), run: ProcessResult::skipped() }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
