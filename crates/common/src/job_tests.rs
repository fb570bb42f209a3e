// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::{Project, RuntimeSelector};

#[test]
fn peek_recovers_id_even_when_request_is_malformed() {
    let id = CorrelationId::new();
    let raw = serde_json::json!({
        "correlation_id": id.to_string(),
        "request": "not a request",
    });
    let bytes = serde_json::to_vec(&raw).unwrap();
    assert_eq!(peek_correlation_id(&bytes), Some(id));
}

#[test]
fn peek_fails_when_correlation_id_itself_is_missing() {
    let bytes = serde_json::to_vec(&serde_json::json!({"request": {}})).unwrap();
    assert_eq!(peek_correlation_id(&bytes), None);
}

#[test]
fn well_formed_job_round_trips() {
    let job = Job {
        correlation_id: CorrelationId::new(),
        request: ExecutionRequest {
            runtime: RuntimeSelector { name: "python3".into(), version: None },
            project: Project { entry: "print(1)".into(), files: vec![] },
            process: Default::default(),
        },
    };
    let bytes = serde_json::to_vec(&job).unwrap();
    let decoded: Job = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(decoded.correlation_id, job.correlation_id);
}
