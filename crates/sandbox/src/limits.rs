// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process rlimits applied between fork and exec.
//!
//! §4.5 design-intent: `max_open_files` and `max_processes` are present
//! in the request schema. This resolves the Open Question from spec.md
//! §9 by enforcing them via `RLIMIT_NOFILE`/`RLIMIT_NPROC` rather than
//! leaving the gap silent. Read/write/network `permissions` are NOT
//! containerized here — that would need a platform-specific sandbox
//! (namespaces, seccomp) out of scope for this exercise; see DESIGN.md.

use rlimit::Resource;
use tokio::process::Command;

/// Rlimits to apply to a spawned child, derived from the request's
/// `process` limits.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceLimits {
    pub max_open_files: Option<u64>,
    pub max_processes: Option<u64>,
}

impl ResourceLimits {
    /// Install a `pre_exec` hook on `cmd` that applies these limits in the
    /// child after fork, before exec.
    ///
    /// # Safety invariant
    ///
    /// The closure runs after `fork()` and before `exec()`, so it must
    /// only call async-signal-safe functions. `setrlimit(2)` is
    /// documented async-signal-safe; nothing else runs in the closure.
    pub fn apply(self, cmd: &mut Command) {
        if self.max_open_files.is_none() && self.max_processes.is_none() {
            return;
        }

        // SAFETY: the closure below only calls `setrlimit`, which is
        // async-signal-safe, and touches no heap state shared with the
        // parent process.
        unsafe {
            cmd.pre_exec(move || {
                if let Some(n) = self.max_open_files {
                    Resource::NOFILE.set(n, n).map_err(std::io::Error::from)?;
                }
                if let Some(n) = self.max_processes {
                    Resource::NPROC.set(n, n).map_err(std::io::Error::from)?;
                }
                Ok(())
            });
        }
    }
}
