// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Outcome of a single compile-or-run phase.

use serde::{Deserialize, Serialize};

/// Captured output and resource usage of one spawned process.
///
/// Zero-valued (`Default::default()`) when the phase is skipped entirely
/// (an interpreted language's compile phase) rather than attempted and
/// failing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessResult {
    #[serde(default)]
    pub stdout: String,
    #[serde(default)]
    pub stderr: String,
    #[serde(default)]
    pub combined: String,
    #[serde(default)]
    pub time_ms: i32,
    #[serde(default)]
    pub memory_bytes: u64,
    #[serde(default)]
    pub exit_code: i32,
}

impl ProcessResult {
    /// A result for a phase that was never attempted: zero-valued, which is
    /// treated as `exit_code == 0` by `ResponseTask::status`.
    pub fn skipped() -> Self {
        Self::default()
    }

    /// A result for a phase that failed before a child process could even
    /// be spawned (decode failure, unknown runtime, path-escape rejection,
    /// spawn failure). Always carries a non-zero exit code and a
    /// descriptive message in both `stdout`/`combined` fields so it reads
    /// naturally to the client regardless of which field they inspect.
    pub fn infra_failure(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            stdout: message.clone(),
            stderr: String::new(),
            combined: message,
            time_ms: 0,
            memory_bytes: 0,
            exit_code: 1,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }
}

#[cfg(test)]
#[path = "process_result_tests.rs"]
mod tests;
