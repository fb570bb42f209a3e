// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task: the sandboxed execution of one [`lambda_common::Job`] against a
//! resolved [`RuntimeDescriptor`].

use crate::limits::ResourceLimits;
use crate::process;
use crate::workspace::{Workspace, WorkspaceError};
use lambda_common::{ExecutionRequest, ProcessResult, RuntimeDescriptor, WorkerResponse, DEFAULT_COMPILE_TIMEOUT};
use std::collections::HashMap;
use std::path::Path;

/// Run the compile (if any) and run phases for one request, inside a
/// fresh workspace under `scratch_root`.
///
/// Never propagates an error: every failure (workspace creation, path
/// escape, spawn failure, non-zero exit, deadline) is converted to a
/// [`WorkerResponse`] before returning, per §7's propagation policy. The
/// workspace is destroyed on every exit path via `Workspace`'s `Drop`.
pub async fn execute(request: &ExecutionRequest, descriptor: &RuntimeDescriptor, scratch_root: &Path) -> WorkerResponse {
    let workspace = match Workspace::create(scratch_root) {
        Ok(ws) => ws,
        Err(e) => return compile_failure(format!("failed to prepare workspace: {e}")),
    };

    let entry_path = match workspace.materialize(&descriptor.extension, &request.project.entry, &request.project.files) {
        Ok(path) => path,
        Err(WorkspaceError::PathEscape(name)) => {
            return compile_failure(format!("file name escapes the workspace: {name}"))
        }
        Err(e) => return compile_failure(format!("failed to materialize project: {e}")),
    };

    let absolute_output = workspace.path().join("main");

    let compile_result = if descriptor.is_interpreted() {
        ProcessResult::skipped()
    } else {
        let mut compile_result = ProcessResult::skipped();
        for template in &descriptor.compile_cmds {
            let argv = lambda_common::expand_cmd(
                template,
                &entry_path.display().to_string(),
                &absolute_output.display().to_string(),
            );
            compile_result = process::run(
                &argv,
                workspace.path(),
                &HashMap::new(),
                "",
                DEFAULT_COMPILE_TIMEOUT,
                ResourceLimits::default(),
            )
            .await;
            if !compile_result.succeeded() {
                break;
            }
        }
        compile_result
    };

    if !compile_result.succeeded() {
        return WorkerResponse { compile: compile_result, run: ProcessResult::skipped() };
    }

    let relative_entry = format!("main.{}", descriptor.extension);
    let relative_output = "./main".to_string();

    let limits = ResourceLimits {
        max_open_files: request.process.max_open_files,
        max_processes: request.process.max_processes,
    };

    let mut run_result = ProcessResult::skipped();
    for template in &descriptor.run_cmds {
        let argv = lambda_common::expand_cmd(template, &relative_entry, &relative_output);
        run_result = process::run(
            &argv,
            workspace.path(),
            &request.process.env,
            &request.process.stdin,
            request.process.cpu_time,
            limits,
        )
        .await;
        if !run_result.succeeded() {
            break;
        }
    }

    WorkerResponse { compile: compile_result, run: run_result }
}

fn compile_failure(message: String) -> WorkerResponse {
    WorkerResponse { compile: ProcessResult::infra_failure(message), run: ProcessResult::skipped() }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
