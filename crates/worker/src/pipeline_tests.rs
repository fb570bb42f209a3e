// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use lambda_common::{CorrelationId, ExecutionRequest, Project, RuntimeSelector};

fn catalog_with_python() -> Catalog {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        dir.path().join("python3.yaml"),
        "name: python3\nextension: py\ncompile_cmds: []\nrun_cmds:\n  - [\"python3\", \"<entry>\"]\n",
    )
    .expect("write descriptor");
    Catalog::load(dir.path()).expect("load catalog")
}

#[tokio::test]
async fn malformed_job_still_replies_using_recovered_correlation_id() {
    let catalog = catalog_with_python();
    let scratch = tempfile::tempdir().expect("tempdir");
    let id = CorrelationId::new();
    let raw = serde_json::to_vec(&serde_json::json!({
        "correlation_id": id.to_string(),
        "request": "not an execution request",
    }))
    .unwrap();

    let envelope = handle_job(&raw, &catalog, scratch.path()).await.expect("recovered id");
    assert_eq!(envelope.correlation_id, id);
    assert!(!envelope.response.compile.succeeded());
}

#[tokio::test]
async fn totally_unparseable_job_yields_none() {
    let catalog = catalog_with_python();
    let scratch = tempfile::tempdir().expect("tempdir");
    let envelope = handle_job(b"not json at all", &catalog, scratch.path()).await;
    assert!(envelope.is_none());
}

#[tokio::test]
async fn unknown_runtime_reports_language_not_found() {
    let catalog = catalog_with_python();
    let scratch = tempfile::tempdir().expect("tempdir");
    let job = Job {
        correlation_id: CorrelationId::new(),
        request: ExecutionRequest {
            runtime: RuntimeSelector { name: "brainfuck".into(), version: None },
            project: Project { entry: String::new(), files: vec![] },
            process: Default::default(),
        },
    };
    let raw = serde_json::to_vec(&job).unwrap();

    let envelope = handle_job(&raw, &catalog, scratch.path()).await.unwrap();
    assert_eq!(envelope.response.compile.exit_code, 1);
    assert_eq!(envelope.response.compile.stdout, "Language not found");
}

#[tokio::test]
async fn known_runtime_executes_and_replies() {
    let catalog = catalog_with_python();
    let scratch = tempfile::tempdir().expect("tempdir");
    let job = Job {
        correlation_id: CorrelationId::new(),
        request: ExecutionRequest {
            runtime: RuntimeSelector { name: "python3".into(), version: None },
            project: Project { entry: "print(1+2)".into(), files: vec![] },
            process: Default::default(),
        },
    };
    let raw = serde_json::to_vec(&job).unwrap();

    let envelope = handle_job(&raw, &catalog, scratch.path()).await.unwrap();
    assert_eq!(envelope.correlation_id, job.correlation_id);
    assert_eq!(envelope.response.run.stdout, "3\n");
}
