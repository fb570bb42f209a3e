// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The [`WorkerDirectory`] trait and the selection policy over it.

use async_trait::async_trait;
use lambda_common::{WorkerId, WorkerRecord};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("worker directory unavailable: {0}")]
    Unavailable(String),
    #[error("no worker available")]
    NoWorkerAvailable,
}

/// Redis key for the set of live worker ids (§6).
pub const WORKERS_SET_KEY: &str = "workers";

/// Redis key for one worker's record (§6).
pub fn worker_key(id: &WorkerId) -> String {
    format!("worker:{id}")
}

/// Shared, cross-process registry of live workers and their load.
///
/// `register`/`unregister` are atomic with respect to the invariant that
/// for any id present in the workers set there must exist a record: a
/// reader must never observe an id without a record, nor a record without
/// set membership.
#[async_trait]
pub trait WorkerDirectory: Send + Sync {
    async fn register(&self, id: WorkerId, record: WorkerRecord) -> Result<(), DirectoryError>;

    /// Overwrite the record for `id`. No set mutation — may be called
    /// concurrently with the worker processing jobs.
    async fn heartbeat(&self, id: WorkerId, record: WorkerRecord) -> Result<(), DirectoryError>;

    async fn unregister(&self, id: WorkerId) -> Result<(), DirectoryError>;

    /// Current records for all ids in the set. Tolerant of best-effort
    /// consistency: an id with no matching record (a brief window during
    /// an in-flight registration) is dropped rather than failing the
    /// whole query.
    async fn snapshot(&self) -> Result<Vec<WorkerRecord>, DirectoryError>;
}

/// Selection policy (§4.2): query the directory and pick the
/// least-loaded live worker, or `NoWorkerAvailable` on an empty snapshot.
pub async fn select_worker(directory: &dyn WorkerDirectory) -> Result<WorkerRecord, DirectoryError> {
    let snapshot = directory.snapshot().await?;
    lambda_common::pick_best(&snapshot).ok_or(DirectoryError::NoWorkerAvailable)
}

#[cfg(test)]
#[path = "directory_tests.rs"]
mod tests;
