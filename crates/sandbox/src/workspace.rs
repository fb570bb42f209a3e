// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-task scratch workspace: creation, materialization, guaranteed
//! cleanup on every exit path.

use lambda_common::ProjectFile;
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("failed to create workspace at {path}: {source}")]
    Create { path: PathBuf, source: std::io::Error },
    #[error("failed to write {name}: {source}")]
    Write { name: String, source: std::io::Error },
    #[error("file name escapes the workspace: {0}")]
    PathEscape(String),
}

/// A fresh scratch directory under the worker's scratch root, named by a
/// collision-resistant identifier (time + random, via a UUID).
///
/// The directory is exclusively owned by one task. [`Drop`] removes it
/// best-effort — failures are logged, never surfaced, matching the
/// "resource cleanup failure" policy (§7): cleanup never changes the
/// reply that's already been computed.
pub struct Workspace {
    path: PathBuf,
}

impl Workspace {
    /// Create a fresh workspace directory under `root`.
    pub fn create(root: &Path) -> Result<Self, WorkspaceError> {
        let name = format!("{}-{}", now_nanos(), Uuid::new_v4());
        let path = root.join(name);
        std::fs::create_dir_all(&path).map_err(|source| WorkspaceError::Create { path: path.clone(), source })?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the entry source to `main.<ext>` and every auxiliary file at
    /// its declared name, joined relative to the workspace.
    ///
    /// Rejects any file name containing a `..` segment or an absolute
    /// path before touching the filesystem — this is a compile-phase
    /// failure (§4.5), never a panic or a partially-written workspace.
    pub fn materialize(
        &self,
        extension: &str,
        entry_source: &str,
        files: &[ProjectFile],
    ) -> Result<PathBuf, WorkspaceError> {
        let entry_path = self.path.join(format!("main.{extension}"));
        std::fs::write(&entry_path, entry_source)
            .map_err(|source| WorkspaceError::Write { name: entry_path.display().to_string(), source })?;

        for file in files {
            let resolved = self.resolve_within(&file.name)?;
            if let Some(parent) = resolved.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|source| WorkspaceError::Write { name: file.name.clone(), source })?;
            }
            std::fs::write(&resolved, &file.contents)
                .map_err(|source| WorkspaceError::Write { name: file.name.clone(), source })?;
        }

        Ok(entry_path)
    }

    fn resolve_within(&self, name: &str) -> Result<PathBuf, WorkspaceError> {
        let candidate = Path::new(name);
        if candidate.is_absolute() || candidate.components().any(|c| matches!(c, std::path::Component::ParentDir)) {
            return Err(WorkspaceError::PathEscape(name.to_string()));
        }
        Ok(self.path.join(candidate))
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_dir_all(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to clean up task workspace");
            }
        }
    }
}

fn now_nanos() -> u128 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0)
}

#[cfg(test)]
#[path = "workspace_tests.rs"]
mod tests;
