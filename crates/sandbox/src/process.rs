// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process execution contract (§4.5): spawn, capture, enforce the CPU
//! time deadline, sample RSS, and never let a child escape as a zombie.

use crate::limits::ResourceLimits;
use lambda_common::ProcessResult;
use nix::sys::signal::{killpg, Signal};
use nix::unistd::Pid;
use std::collections::HashMap;
use std::path::Path;
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tokio::time::timeout;

/// Synthetic exit code reported when the CPU time deadline is exceeded
/// and the child carries no exit status of its own (matches the `timeout`
/// coreutil convention, so logs read familiarly).
pub const DEADLINE_EXCEEDED_EXIT_CODE: i32 = 124;

/// Synthetic exit code reported when the child process could not be
/// spawned at all (missing executable, permission denied, ...).
pub const SPAWN_FAILED_EXIT_CODE: i32 = 127;

/// Poll interval for RSS sampling while the child runs.
const RSS_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Run one argv under a CPU-time deadline, capturing stdout/stderr
/// separately and combined, wall time and peak RSS.
///
/// Never returns `Err` for anything the process itself does — spawn
/// failure, non-zero exit and deadline are all encoded in the returned
/// [`ProcessResult`] per the per-phase state machine in §4.5. Only a
/// failure to construct the command's own stdio pipes is not expected and
/// would indicate a resource-exhausted host, in which case this still
/// produces a [`ProcessResult`] describing the spawn failure rather than
/// propagating.
pub async fn run(
    argv: &[String],
    cwd: &Path,
    env: &HashMap<String, String>,
    stdin: &str,
    cpu_time: Duration,
    limits: ResourceLimits,
) -> ProcessResult {
    let Some((program, args)) = argv.split_first() else {
        return ProcessResult::infra_failure("empty command");
    };

    let mut cmd = Command::new(program);
    cmd.args(args)
        .current_dir(cwd)
        .envs(env)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    cmd.process_group(0);
    limits.apply(&mut cmd);

    let start = Instant::now();
    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => {
            return ProcessResult {
                stdout: String::new(),
                stderr: format!("failed to spawn {program}: {e}"),
                combined: format!("failed to spawn {program}: {e}"),
                time_ms: 0,
                memory_bytes: 0,
                exit_code: SPAWN_FAILED_EXIT_CODE,
            };
        }
    };

    let pid = child.id();
    let peak_rss = Arc::new(AtomicU64::new(0));
    let sampler = pid.map(|pid| tokio::spawn(sample_peak_rss(pid, peak_rss.clone())));

    // Readers and the stdin writer all run as independent spawned tasks so
    // a child that interleaves reading stdin with writing stdout/stderr
    // can never wedge the parent: nothing here blocks `child.wait()`, which
    // is what the deadline guard below actually reaps.
    let mut stdout_pipe = child.stdout.take();
    let mut stderr_pipe = child.stderr.take();
    let stdout_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        if let Some(pipe) = stdout_pipe.as_mut() {
            let _ = pipe.read_to_end(&mut buf).await;
        }
        buf
    });
    let stderr_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        if let Some(pipe) = stderr_pipe.as_mut() {
            let _ = pipe.read_to_end(&mut buf).await;
        }
        buf
    });

    let stdin_handle = child.stdin.take();
    let stdin_payload = stdin.to_string();
    let stdin_task = tokio::spawn(async move {
        if let Some(mut handle) = stdin_handle {
            if !stdin_payload.is_empty() {
                let _ = handle.write_all(stdin_payload.as_bytes()).await;
            }
            // Drop `handle` here to close the child's stdin, signaling EOF
            // to programs that read until end-of-input.
        }
    });

    let wait_result = timeout(cpu_time, child.wait()).await;

    let exit_code = match wait_result {
        Ok(Ok(status)) => status.code().unwrap_or(SPAWN_FAILED_EXIT_CODE),
        Ok(Err(_)) => SPAWN_FAILED_EXIT_CODE,
        Err(_elapsed) => {
            if let Some(pid) = pid {
                let _ = killpg(Pid::from_raw(pid as i32), Signal::SIGKILL);
            }
            let _ = timeout(Duration::from_secs(1), child.wait()).await;
            DEADLINE_EXCEEDED_EXIT_CODE
        }
    };

    if let Some(sampler) = sampler {
        sampler.abort();
    }
    stdin_task.abort();

    let stdout_bytes = stdout_task.await.unwrap_or_default();
    let stderr_bytes = stderr_task.await.unwrap_or_default();
    let stdout = String::from_utf8_lossy(&stdout_bytes).into_owned();
    let stderr = String::from_utf8_lossy(&stderr_bytes).into_owned();
    let combined = format!("{stdout}{stderr}");

    ProcessResult {
        stdout,
        stderr,
        combined,
        time_ms: start.elapsed().as_millis() as i32,
        memory_bytes: peak_rss.load(Ordering::Relaxed),
        exit_code,
    }
}

/// Sample `/proc/<pid>/status`'s `VmHWM` (peak resident set size) at a
/// fixed interval while the child is alive.
///
/// Resolves the Open Question in spec.md §9: sampling happens
/// continuously while the process runs rather than in a helper that
/// calls `wait()` first, so the recorded peak never collapses to zero
/// because the process had already been reaped.
async fn sample_peak_rss(pid: u32, peak: Arc<AtomicU64>) {
    let path = format!("/proc/{pid}/status");
    let mut interval = tokio::time::interval(RSS_POLL_INTERVAL);
    loop {
        interval.tick().await;
        if let Ok(contents) = tokio::fs::read_to_string(&path).await {
            if let Some(kb) = parse_vm_hwm_kb(&contents) {
                peak.fetch_max(kb * 1024, Ordering::Relaxed);
            }
        }
    }
}

fn parse_vm_hwm_kb(status: &str) -> Option<u64> {
    status.lines().find_map(|line| {
        let rest = line.strip_prefix("VmHWM:")?;
        rest.trim().split_whitespace().next()?.parse::<u64>().ok()
    })
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
