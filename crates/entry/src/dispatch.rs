// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dispatch: the sequence that turns one inbound HTTP body into a
//! published job and an awaited reply.

use crate::multiplexer::ReplyMultiplexer;
use lambda_broker::{job_queue, Broker};
use lambda_common::{CorrelationId, ExecutionRequest, Job, ResponseTask};
use lambda_directory::{select_worker, WorkerDirectory};
use std::time::Duration;
use tracing::Instrument;

/// Fixed slack added to the request's own `cpu_time` to get the total
/// dispatch-to-reply budget (§4.3 design default).
pub const DISPATCH_SLACK: Duration = Duration::from_secs(10);

pub enum Outcome {
    /// A full round trip completed — the body's `status` field tells the
    /// caller whether the program itself succeeded.
    RoundTrip(ResponseTask),
    /// Dispatch never reached a worker, or no reply arrived in time.
    InfraFailure(ResponseTask),
}

pub async fn execute(
    request: ExecutionRequest,
    directory: &dyn WorkerDirectory,
    broker: &dyn Broker,
    multiplexer: &ReplyMultiplexer,
) -> Outcome {
    let worker = match select_worker(directory).await {
        Ok(worker) => worker,
        Err(e) => return Outcome::InfraFailure(ResponseTask::failed(format!("no worker available: {e}"))),
    };

    let correlation_id = CorrelationId::new();
    let span = tracing::info_span!("dispatch", correlation_id = %correlation_id, worker_id = %worker.id);

    async move {
        let deadline = request.process.cpu_time + DISPATCH_SLACK;
        let job = Job { correlation_id, request };

        let payload = match serde_json::to_vec(&job) {
            Ok(bytes) => bytes,
            Err(e) => return Outcome::InfraFailure(ResponseTask::failed(format!("failed to encode job: {e}"))),
        };

        if let Err(e) = broker.publish(&job_queue(worker.id), &payload).await {
            return Outcome::InfraFailure(ResponseTask::failed(format!("failed to dispatch job: {e}")));
        }

        match multiplexer.wait_for(correlation_id, deadline).await {
            Some(envelope) => Outcome::RoundTrip(ResponseTask::from_response(envelope.response)),
            None => Outcome::InfraFailure(ResponseTask::failed("dispatch-to-reply deadline exceeded")),
        }
    }
    .instrument(span)
    .await
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
