// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use lambda_common::{Project, RuntimeSelector};
use std::time::Duration;

fn request(entry: &str, cpu_time: Duration) -> ExecutionRequest {
    ExecutionRequest {
        runtime: RuntimeSelector { name: "python3".into(), version: None },
        project: Project { entry: entry.into(), files: vec![] },
        process: lambda_common::ProcessLimits { cpu_time, ..Default::default() },
    }
}

fn python_descriptor() -> RuntimeDescriptor {
    RuntimeDescriptor {
        name: "python3".into(),
        extension: "py".into(),
        compile_cmds: vec![],
        run_cmds: vec![vec!["python3".into(), "<entry>".into()]],
    }
}

fn c_descriptor() -> RuntimeDescriptor {
    RuntimeDescriptor {
        name: "c".into(),
        extension: "c".into(),
        compile_cmds: vec![vec!["gcc".into(), "<entry>".into(), "-o".into(), "<output>".into()]],
        run_cmds: vec![vec!["<output>".into()]],
    }
}

#[tokio::test]
async fn s1_interpreted_success() {
    let root = tempfile::tempdir().expect("tempdir");
    let req = request("print(1+2)", Duration::from_secs(2));
    let response = execute(&req, &python_descriptor(), root.path()).await;
    assert!(response.compile.succeeded());
    assert!(response.run.succeeded());
    assert_eq!(response.run.stdout, "3\n");
}

#[tokio::test]
async fn s2_compiled_success() {
    let root = tempfile::tempdir().expect("tempdir");
    let req = request("int main(){return 0;}", Duration::from_secs(5));
    let response = execute(&req, &c_descriptor(), root.path()).await;
    assert!(response.compile.succeeded());
    assert!(response.run.succeeded());
}

#[tokio::test]
async fn s3_compile_failure_skips_run() {
    let root = tempfile::tempdir().expect("tempdir");
    let req = request("int main(){return", Duration::from_secs(5));
    let response = execute(&req, &c_descriptor(), root.path()).await;
    assert!(!response.compile.succeeded());
    assert_eq!(response.run, ProcessResult::skipped());
}

#[tokio::test]
async fn s5_deadline_exceeded() {
    let root = tempfile::tempdir().expect("tempdir");
    let req = request("while True: pass", Duration::from_millis(500));
    let response = execute(&req, &python_descriptor(), root.path()).await;
    assert!(!response.run.succeeded());
    assert!((response.run.time_ms as u64) <= 500 + 500);
}

#[tokio::test]
async fn path_escape_is_a_compile_failure() {
    let root = tempfile::tempdir().expect("tempdir");
    let mut req = request("print(1)", Duration::from_secs(2));
    req.project.files.push(lambda_common::ProjectFile { name: "../evil".into(), contents: "x".into() });
    let response = execute(&req, &python_descriptor(), root.path()).await;
    assert!(!response.compile.succeeded());
    assert_eq!(response.run, ProcessResult::skipped());
}

#[tokio::test]
async fn workspace_is_removed_after_task_completes() {
    let root = tempfile::tempdir().expect("tempdir");
    let req = request("print(1)", Duration::from_secs(2));
    execute(&req, &python_descriptor(), root.path()).await;
    let remaining: Vec<_> = std::fs::read_dir(root.path()).expect("read dir").collect();
    assert!(remaining.is_empty());
}
