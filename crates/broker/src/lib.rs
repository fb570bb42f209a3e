// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

//! Message broker client: one queue per worker plus the shared `"reply"`
//! queue, both non-durable, auto-ack on consume (§6).
//!
//! The broker moves raw JSON bytes, not typed messages — decoding lives
//! with the caller (Worker for jobs, Entry's reply multiplexer for
//! replies) because a decode failure still needs enough of the message
//! to answer sensibly (e.g. extracting `correlation_id` from an
//! otherwise-malformed job, §4.4 step 1).

mod fake;
mod rabbitmq;

pub use fake::FakeBroker;
pub use rabbitmq::RabbitMqBroker;

use async_trait::async_trait;
use lambda_common::WorkerId;
use std::time::Duration;
use thiserror::Error;

/// Small fixed timeout for broker publish (§5, design default 1s).
pub const PUBLISH_TIMEOUT: Duration = Duration::from_secs(1);

/// Name of the shared reply queue (§6).
pub const REPLY_QUEUE: &str = "reply";

#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("broker publish timed out after {0:?}")]
    PublishTimeout(Duration),
    #[error("broker transport error: {0}")]
    Transport(String),
}

/// A stream of raw inbound message bodies from one queue. Consumption
/// MUST NOT block on anything downstream — callers read from this at
/// their own pace; the broker connection keeps draining regardless (§5).
/// `recv` returns `Ok(None)` only when the queue will never yield again
/// (connection closed for good).
#[async_trait]
pub trait MessageStream: Send {
    async fn recv(&mut self) -> Result<Option<Vec<u8>>, BrokerError>;
}

/// Publish and consume access to the job/reply queues, by name.
#[async_trait]
pub trait Broker: Send + Sync {
    /// Declare (idempotently) and consume from a queue.
    async fn consume(&self, queue: &str) -> Result<Box<dyn MessageStream>, BrokerError>;

    /// Publish a message body to a queue, bounded by [`PUBLISH_TIMEOUT`].
    async fn publish(&self, queue: &str, payload: &[u8]) -> Result<(), BrokerError>;
}

/// Name of a worker's job queue (§6: "named with the worker's UUID string").
pub fn job_queue(worker_id: WorkerId) -> String {
    worker_id.to_string()
}

/// Wrap a publish future with the fixed broker timeout, converting
/// elapsed-timeout into [`BrokerError::PublishTimeout`].
pub async fn with_publish_timeout<F, T>(fut: F) -> Result<T, BrokerError>
where
    F: std::future::Future<Output = Result<T, BrokerError>>,
{
    tokio::time::timeout(PUBLISH_TIMEOUT, fut)
        .await
        .map_err(|_| BrokerError::PublishTimeout(PUBLISH_TIMEOUT))?
}
