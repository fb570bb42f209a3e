// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

//! Lambda Worker (lambdad)
//!
//! Long-lived process that registers in the Worker Directory, consumes
//! jobs from its own queue, runs them in the sandbox, and publishes
//! replies to the shared `"reply"` queue.

mod env;
mod pipeline;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use lambda_broker::{job_queue, Broker, RabbitMqBroker, REPLY_QUEUE};
use lambda_catalog::Catalog;
use lambda_directory::{now_ms, sample_cpu_usage, RedisDirectory, WorkerDirectory};
use lambda_common::{ReplyEnvelope, WorkerId, WorkerRecord};
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use crate::env::Config;

/// Worker concurrency bound (§4.4 design default).
const MAX_CONCURRENT_JOBS: usize = 10;

/// Heartbeat cadence (§4.2 design default).
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_logging();

    let config = Config::load()?;
    let catalog = Arc::new(Catalog::load(&config.runtimes_dir)?);
    info!(runtimes = catalog.len(), "catalog loaded");

    let broker: Arc<dyn Broker> = Arc::new(RabbitMqBroker::connect(&config.rabbitmq_addr).await?);
    let directory: Arc<dyn WorkerDirectory> = Arc::new(RedisDirectory::connect(&config.redis_addr).await?);

    let worker_id = if config.debug_worker_id { WorkerId::nil() } else { WorkerId::new() };
    let scratch_root = scratch_root_for(worker_id)?;

    let initial_record = WorkerRecord { id: worker_id, cpu_usage: sample_cpu_usage().await, last_updated_ms: now_ms() };
    directory.register(worker_id, initial_record).await?;
    info!(%worker_id, scratch_root = %scratch_root.display(), "worker registered");

    let heartbeat_handle = spawn_heartbeat(Arc::clone(&directory), worker_id);

    let mut stream = broker.consume(&job_queue(worker_id)).await?;
    let semaphore = Arc::new(Semaphore::new(MAX_CONCURRENT_JOBS));

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    info!(%worker_id, "worker ready, consuming jobs");

    loop {
        tokio::select! {
            received = stream.recv() => {
                match received {
                    Ok(Some(raw)) => {
                        // The semaphore is never closed while the worker runs, so this
                        // only fails during the drain-and-shutdown sequence below.
                        match Arc::clone(&semaphore).acquire_owned().await {
                            Ok(permit) => spawn_job(permit, raw, Arc::clone(&catalog), scratch_root.clone(), Arc::clone(&broker)),
                            Err(_) => {
                                info!("semaphore closed, shutting down");
                                break;
                            }
                        }
                    }
                    Ok(None) => {
                        info!("broker closed the job queue, shutting down");
                        break;
                    }
                    Err(e) => {
                        error!(error = %e, "error consuming from job queue");
                    }
                }
            }
            _ = sigterm.recv() => {
                info!("received SIGTERM, shutting down");
                break;
            }
            _ = sigint.recv() => {
                info!("received SIGINT, shutting down");
                break;
            }
        }
    }

    heartbeat_handle.abort();

    // Drain in-flight jobs: acquiring every permit blocks until all of them
    // have been returned, i.e. every spawned job has finished.
    let _ = semaphore.acquire_many(MAX_CONCURRENT_JOBS as u32).await;

    if let Err(e) = directory.unregister(worker_id).await {
        warn!(error = %e, "failed to unregister worker on shutdown");
    }
    let _ = std::fs::remove_dir_all(&scratch_root);

    info!(%worker_id, "worker stopped");
    Ok(())
}

fn spawn_job(
    _permit: tokio::sync::OwnedSemaphorePermit,
    raw: Vec<u8>,
    catalog: Arc<Catalog>,
    scratch_root: PathBuf,
    broker: Arc<dyn Broker>,
) {
    tokio::spawn(async move {
        let envelope = pipeline::handle_job(&raw, &catalog, &scratch_root).await;
        let Some(envelope) = envelope else {
            warn!("dropping job with no recoverable correlation id");
            return;
        };
        publish_reply(&*broker, &envelope).await;
    });
}

async fn publish_reply(broker: &dyn Broker, envelope: &ReplyEnvelope) {
    let payload = match serde_json::to_vec(envelope) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(correlation_id = %envelope.correlation_id, error = %e, "failed to encode reply envelope");
            return;
        }
    };
    if let Err(e) = broker.publish(REPLY_QUEUE, &payload).await {
        error!(correlation_id = %envelope.correlation_id, error = %e, "failed to publish reply");
    }
}

fn spawn_heartbeat(directory: Arc<dyn WorkerDirectory>, worker_id: WorkerId) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(HEARTBEAT_INTERVAL);
        interval.tick().await; // first tick fires immediately; skip it, register() already sampled once
        loop {
            interval.tick().await;
            let record = WorkerRecord { id: worker_id, cpu_usage: sample_cpu_usage().await, last_updated_ms: now_ms() };
            if let Err(e) = directory.heartbeat(worker_id, record).await {
                warn!(%worker_id, error = %e, "heartbeat failed");
            }
        }
    })
}

fn scratch_root_for(worker_id: WorkerId) -> anyhow::Result<PathBuf> {
    let root = std::env::temp_dir().join(format!("lambda-worker-{worker_id}"));
    std::fs::create_dir_all(&root)?;
    Ok(root)
}

fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
