// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime descriptor: a single language's entry in the catalog.

use serde::{Deserialize, Serialize};

/// One language's compile/run recipe, as parsed from a descriptor file.
///
/// Immutable once loaded. `compile_cmds` is empty for interpreted
/// languages; `run_cmds` is always non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeDescriptor {
    pub name: String,
    pub extension: String,
    #[serde(default)]
    pub compile_cmds: Vec<Vec<String>>,
    pub run_cmds: Vec<Vec<String>>,
}

impl RuntimeDescriptor {
    pub fn is_interpreted(&self) -> bool {
        self.compile_cmds.is_empty()
    }
}

/// Expand every `<entry>` and `<output>` token in an argv template.
///
/// Pure text substitution — the result is handed directly to `exec` as
/// argv, never to a shell. A fixed point under re-expansion with the same
/// `entry`/`output` pair, since neither token can reappear once replaced
/// unless `entry`/`output` themselves contain the literal tokens (callers
/// must supply paths that don't).
pub fn expand_cmd(template: &[String], entry: &str, output: &str) -> Vec<String> {
    template
        .iter()
        .map(|arg| arg.replace("<entry>", entry).replace("<output>", output))
        .collect()
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
