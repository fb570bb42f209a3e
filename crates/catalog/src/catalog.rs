// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Loading and lookup for the Runtime Catalog.

use lambda_common::RuntimeDescriptor;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("runtimes directory not found: {0}")]
    Missing(PathBuf),
    #[error("malformed runtime descriptor {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("failed to read runtimes directory {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Immutable, read-only index of supported languages.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    by_name: HashMap<String, RuntimeDescriptor>,
}

impl Catalog {
    /// Load every `*.yaml` file under `dir` as a [`RuntimeDescriptor`].
    ///
    /// Fails fast on the first malformed descriptor rather than loading a
    /// partial catalog silently — a broken descriptor file is a deploy-time
    /// bug, not a per-request condition.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(CatalogError::Missing(dir.to_path_buf()));
        }

        let entries = std::fs::read_dir(dir).map_err(|source| CatalogError::Unreadable {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut by_name = HashMap::new();
        for entry in entries {
            let entry = entry.map_err(|source| CatalogError::Unreadable {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("yaml") {
                continue;
            }

            let contents = std::fs::read_to_string(&path).map_err(|source| CatalogError::Unreadable {
                path: path.clone(),
                source,
            })?;
            let descriptor: RuntimeDescriptor = serde_yaml::from_str(&contents).map_err(|source| {
                tracing::warn!(path = %path.display(), error = %source, "malformed runtime descriptor");
                CatalogError::Malformed { path: path.clone(), source }
            })?;

            by_name.insert(descriptor.name.clone(), descriptor);
        }

        tracing::info!(count = by_name.len(), dir = %dir.display(), "runtime catalog loaded");
        Ok(Self { by_name })
    }

    /// Look up a descriptor by language name.
    pub fn resolve(&self, name: &str) -> Option<&RuntimeDescriptor> {
        self.by_name.get(name)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
