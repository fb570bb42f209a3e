// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

//! Lambda Entry (lambda-entry)
//!
//! Stateless-per-request HTTP front end: validates a submission, selects a
//! worker, dispatches a job, and awaits the matching reply on the shared
//! reply-queue multiplexer.

mod dispatch;
mod env;
mod multiplexer;

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use lambda_broker::{Broker, RabbitMqBroker, REPLY_QUEUE};
use lambda_common::{ExecutionRequest, ResponseTask};
use lambda_directory::{RedisDirectory, WorkerDirectory};
use tracing::{error, info, warn};

use crate::dispatch::Outcome;
use crate::env::Config;
use crate::multiplexer::ReplyMultiplexer;

/// How often unclaimed buffered replies are swept (§4.3's bounded grace
/// period, applied periodically rather than on every delivery).
const SWEEP_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Clone)]
struct AppState {
    directory: Arc<dyn WorkerDirectory>,
    broker: Arc<dyn Broker>,
    multiplexer: Arc<ReplyMultiplexer>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_logging();

    let config = Config::load()?;

    let broker: Arc<dyn Broker> = Arc::new(RabbitMqBroker::connect(&config.rabbitmq_addr).await?);
    let directory: Arc<dyn WorkerDirectory> = Arc::new(RedisDirectory::connect(&config.redis_addr).await?);
    let multiplexer = Arc::new(ReplyMultiplexer::default());

    spawn_reply_reader(Arc::clone(&broker), Arc::clone(&multiplexer)).await?;
    spawn_sweeper(Arc::clone(&multiplexer));

    let state = AppState { directory, broker, multiplexer };

    let app = Router::new()
        .route("/", get(liveness))
        .route("/api/v1/execute", post(execute))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.server_addr).await?;
    info!(addr = %config.server_addr, "entry listening");
    axum::serve(listener, app).await?;

    Ok(())
}

async fn liveness() -> &'static str {
    "OK"
}

/// `POST /api/v1/execute` (§4.3).
///
/// A parse failure never reaches [`dispatch::execute`]: it is answered
/// directly with `status: "failed"` and an HTTP error code, per §4.3 step
/// 1 and the protocol-error row of §7's error taxonomy.
async fn execute(State(state): State<AppState>, body: axum::body::Bytes) -> Response {
    let request: ExecutionRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "rejecting malformed execute request");
            return stream_response(StatusCode::BAD_REQUEST, ResponseTask::failed(format!("malformed request body: {e}")));
        }
    };

    let outcome = dispatch::execute(request, state.directory.as_ref(), state.broker.as_ref(), &state.multiplexer).await;

    match outcome {
        Outcome::RoundTrip(task) => stream_response(StatusCode::OK, task),
        Outcome::InfraFailure(task) => {
            error!(status = ?task.status, "dispatch infrastructure failure");
            stream_response(StatusCode::SERVICE_UNAVAILABLE, task)
        }
    }
}

/// Wrap a [`ResponseTask`] as a single-chunk `application/stream+json`
/// body. `ResponseTask` is only known once the full round trip
/// completes, so "streaming" here is the wire framing spec.md §6
/// requires, not a progressively-written response.
fn stream_response(status: StatusCode, task: ResponseTask) -> Response {
    let body = match serde_json::to_vec(&task) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(error = %e, "failed to encode response task");
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(serde_json::json!({"status": "failed"}))).into_response();
        }
    };

    let mut response = Response::new(Body::from_stream(tokio_stream::once(Ok::<_, std::io::Error>(body))));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, header::HeaderValue::from_static("application/stream+json"));
    response
}

/// One process-wide consumer on the shared `"reply"` queue (§4.3). Every
/// envelope it reads is handed to [`ReplyMultiplexer::deliver`], which
/// never blocks on a waiter's progress — consumption keeps draining
/// regardless of how many handlers are currently awaiting a match.
async fn spawn_reply_reader(broker: Arc<dyn Broker>, multiplexer: Arc<ReplyMultiplexer>) -> anyhow::Result<()> {
    let mut stream = broker.consume(REPLY_QUEUE).await?;
    tokio::spawn(async move {
        loop {
            match stream.recv().await {
                Ok(Some(raw)) => match serde_json::from_slice(&raw) {
                    Ok(envelope) => multiplexer.deliver(envelope),
                    Err(e) => warn!(error = %e, "dropping malformed reply envelope"),
                },
                Ok(None) => {
                    error!("reply queue closed, no further replies will be delivered");
                    break;
                }
                Err(e) => error!(error = %e, "error consuming from reply queue"),
            }
        }
    });
    Ok(())
}

fn spawn_sweeper(multiplexer: Arc<ReplyMultiplexer>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            multiplexer.sweep();
        }
    });
}

fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
