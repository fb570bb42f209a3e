// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the worker binary (§6).

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub rabbitmq_addr: String,
    pub redis_addr: String,
    pub runtimes_dir: PathBuf,
    /// `ENV=DEBUG` pins the worker id to the zero UUID for local bring-up
    /// with a single worker (§9 — retained as an explicit opt-in, not a
    /// silent default).
    pub debug_worker_id: bool,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self {
            rabbitmq_addr: require("RABBITMQ_ADDR")?,
            redis_addr: require("REDIS_ADDR")?,
            runtimes_dir: PathBuf::from(require("RUNTIMES_DIR")?),
            debug_worker_id: std::env::var("ENV").map(|v| v == "DEBUG").unwrap_or(false),
        })
    }
}

fn require(var: &'static str) -> Result<String, ConfigError> {
    std::env::var(var).map_err(|_| ConfigError::Missing(var))
}
