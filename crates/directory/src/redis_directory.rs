// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Redis-backed realization of [`crate::WorkerDirectory`].

use crate::{worker_key, DirectoryError, WorkerDirectory, WORKERS_SET_KEY};
use async_trait::async_trait;
use lambda_common::{WorkerId, WorkerRecord};
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

/// Registry backed by a Redis connection shared across calls.
///
/// Uses a `ConnectionManager` so transient connection drops are retried
/// transparently rather than surfacing as per-call errors.
#[derive(Clone)]
pub struct RedisDirectory {
    conn: ConnectionManager,
}

impl RedisDirectory {
    pub async fn connect(addr: &str) -> Result<Self, DirectoryError> {
        let client = redis::Client::open(addr).map_err(|e| DirectoryError::Unavailable(e.to_string()))?;
        let conn = client
            .get_connection_manager()
            .await
            .map_err(|e| DirectoryError::Unavailable(e.to_string()))?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl WorkerDirectory for RedisDirectory {
    async fn register(&self, id: WorkerId, record: WorkerRecord) -> Result<(), DirectoryError> {
        let payload = serde_json::to_string(&record).map_err(|e| DirectoryError::Unavailable(e.to_string()))?;
        let mut conn = self.conn.clone();
        // Atomic: the id only becomes visible in the set in the same
        // transaction that writes its record, so a reader never observes
        // one without the other.
        redis::pipe()
            .atomic()
            .sadd(WORKERS_SET_KEY, id.to_string())
            .set(worker_key(&id), payload)
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| DirectoryError::Unavailable(e.to_string()))
    }

    async fn heartbeat(&self, id: WorkerId, record: WorkerRecord) -> Result<(), DirectoryError> {
        let payload = serde_json::to_string(&record).map_err(|e| DirectoryError::Unavailable(e.to_string()))?;
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(worker_key(&id), payload)
            .await
            .map_err(|e| DirectoryError::Unavailable(e.to_string()))
    }

    async fn unregister(&self, id: WorkerId) -> Result<(), DirectoryError> {
        let mut conn = self.conn.clone();
        redis::pipe()
            .atomic()
            .del(worker_key(&id))
            .srem(WORKERS_SET_KEY, id.to_string())
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| DirectoryError::Unavailable(e.to_string()))
    }

    async fn snapshot(&self) -> Result<Vec<WorkerRecord>, DirectoryError> {
        let mut conn = self.conn.clone();
        let ids: Vec<String> = conn
            .smembers(WORKERS_SET_KEY)
            .await
            .map_err(|e| DirectoryError::Unavailable(e.to_string()))?;

        let mut records = Vec::with_capacity(ids.len());
        for raw_id in ids {
            let key = format!("worker:{raw_id}");
            let payload: Option<String> = conn
                .get(&key)
                .await
                .map_err(|e| DirectoryError::Unavailable(e.to_string()))?;
            match payload {
                Some(payload) => match serde_json::from_str::<WorkerRecord>(&payload) {
                    Ok(record) => records.push(record),
                    Err(e) => {
                        tracing::warn!(id = %raw_id, error = %e, "dropping unparseable worker record from snapshot")
                    }
                },
                None => {
                    // In-flight registration: id is visible but the record
                    // hasn't landed yet. Best-effort consistency — drop it.
                    tracing::debug!(id = %raw_id, "worker id with no record yet, dropping from snapshot");
                }
            }
        }
        Ok(records)
    }
}
