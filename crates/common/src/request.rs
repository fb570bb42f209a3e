// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client-submitted execution request and its nested types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Which runtime to execute against, and an optional version hint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeSelector {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
}

/// A single auxiliary file in the submitted project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFile {
    pub name: String,
    pub contents: String,
}

/// The small project a client submits: one entry source plus auxiliaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub entry: String,
    #[serde(default)]
    pub files: Vec<ProjectFile>,
}

/// Requested sandbox permissions. Design-intent fields (§4.5): declared on
/// the wire, enforced best-effort by the sandbox (read-only/no-network are
/// not containerized on every platform — see DESIGN.md).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Permissions {
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub write: bool,
    #[serde(default)]
    pub network: bool,
}

/// Per-request resource limits for the run phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessLimits {
    #[serde(with = "humantime_serde", rename = "time", default = "default_cpu_time")]
    pub cpu_time: Duration,
    #[serde(default)]
    pub max_open_files: Option<u64>,
    #[serde(default)]
    pub max_processes: Option<u64>,
    #[serde(default)]
    pub permissions: Permissions,
    #[serde(default)]
    pub env: HashMap<String, String>,
    #[serde(default)]
    pub stdin: String,
}

/// Default CPU time applied to the compile phase, which always runs under
/// worker-chosen defaults rather than the caller's `process` limits (§4.5).
pub const DEFAULT_COMPILE_TIMEOUT: Duration = Duration::from_secs(10);

fn default_cpu_time() -> Duration {
    Duration::from_secs(5)
}

impl Default for ProcessLimits {
    fn default() -> Self {
        Self {
            cpu_time: Duration::from_secs(5),
            max_open_files: None,
            max_processes: None,
            permissions: Permissions::default(),
            env: HashMap::new(),
            stdin: String::new(),
        }
    }
}

/// The full body of `POST /api/v1/execute`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRequest {
    pub runtime: RuntimeSelector,
    pub project: Project,
    #[serde(default)]
    pub process: ProcessLimits,
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
