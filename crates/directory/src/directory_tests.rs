// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::FakeDirectory;

#[tokio::test]
async fn select_worker_on_empty_directory_errors() {
    let directory = FakeDirectory::default();
    let err = select_worker(&directory).await.unwrap_err();
    assert!(matches!(err, DirectoryError::NoWorkerAvailable));
}

#[tokio::test]
async fn select_worker_picks_least_loaded() {
    let directory = FakeDirectory::default();
    let busy = WorkerId::new();
    let idle = WorkerId::new();
    directory
        .register(busy, WorkerRecord { id: busy, cpu_usage: 90.0, last_updated_ms: 1 })
        .await
        .unwrap();
    directory
        .register(idle, WorkerRecord { id: idle, cpu_usage: 5.0, last_updated_ms: 1 })
        .await
        .unwrap();

    let picked = select_worker(&directory).await.unwrap();
    assert_eq!(picked.id, idle);
}

#[tokio::test]
async fn unregister_removes_both_set_and_record() {
    let directory = FakeDirectory::default();
    let id = WorkerId::new();
    directory
        .register(id, WorkerRecord { id, cpu_usage: 1.0, last_updated_ms: 1 })
        .await
        .unwrap();
    directory.unregister(id).await.unwrap();
    let snapshot = directory.snapshot().await.unwrap();
    assert!(snapshot.is_empty());
}

#[tokio::test]
async fn heartbeat_does_not_change_set_membership() {
    let directory = FakeDirectory::default();
    let id = WorkerId::new();
    directory
        .register(id, WorkerRecord { id, cpu_usage: 50.0, last_updated_ms: 1 })
        .await
        .unwrap();
    directory
        .heartbeat(id, WorkerRecord { id, cpu_usage: 10.0, last_updated_ms: 2 })
        .await
        .unwrap();
    let snapshot = directory.snapshot().await.unwrap();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].cpu_usage, 10.0);
}
