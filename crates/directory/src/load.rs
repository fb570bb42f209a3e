// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CPU load sampling for the heartbeat's `cpu_usage` field.

use std::time::Duration;
use sysinfo::System;

/// Minimum sampling window (§4.2): `cpu_usage` is only meaningful as an
/// average over at least one second.
pub const MIN_SAMPLE_WINDOW: Duration = Duration::from_millis(1000);

/// Sample average CPU utilization percentage across logical cores over a
/// fixed recent window.
///
/// `sysinfo` needs two refreshes separated by [`MIN_SAMPLE_WINDOW`] to
/// compute a delta; the first refresh is a throwaway baseline.
pub async fn sample_cpu_usage() -> f64 {
    let mut system = System::new();
    system.refresh_cpu_usage();
    tokio::time::sleep(MIN_SAMPLE_WINDOW).await;
    system.refresh_cpu_usage();

    let cpus = system.cpus();
    if cpus.is_empty() {
        return 0.0;
    }
    let total: f32 = cpus.iter().map(|cpu| cpu.cpu_usage()).sum();
    (total / cpus.len() as f32) as f64
}

/// Current wall-clock time in milliseconds since the Unix epoch, for
/// `last_updated_ms`.
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
