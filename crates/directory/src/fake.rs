// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory directory for tests — no network, deterministic.

use crate::{DirectoryError, WorkerDirectory};
use async_trait::async_trait;
use lambda_common::{WorkerId, WorkerRecord};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Default)]
struct State {
    ids: HashSet<WorkerId>,
    records: HashMap<WorkerId, WorkerRecord>,
}

/// In-memory stand-in for [`RedisDirectory`](crate::RedisDirectory),
/// preserving the same set+record atomicity invariant.
#[derive(Clone, Default)]
pub struct FakeDirectory {
    state: Arc<Mutex<State>>,
}

#[async_trait]
impl WorkerDirectory for FakeDirectory {
    async fn register(&self, id: WorkerId, record: WorkerRecord) -> Result<(), DirectoryError> {
        let mut state = self.state.lock().await;
        state.ids.insert(id);
        state.records.insert(id, record);
        Ok(())
    }

    async fn heartbeat(&self, id: WorkerId, record: WorkerRecord) -> Result<(), DirectoryError> {
        let mut state = self.state.lock().await;
        state.records.insert(id, record);
        Ok(())
    }

    async fn unregister(&self, id: WorkerId) -> Result<(), DirectoryError> {
        let mut state = self.state.lock().await;
        state.records.remove(&id);
        state.ids.remove(&id);
        Ok(())
    }

    async fn snapshot(&self) -> Result<Vec<WorkerRecord>, DirectoryError> {
        let state = self.state.lock().await;
        Ok(state
            .ids
            .iter()
            .filter_map(|id| state.records.get(id).copied())
            .collect())
    }
}
