// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory broker for tests — no network, exercises the same
//! publish/consume contract as [`crate::RabbitMqBroker`].

use crate::{Broker, BrokerError, MessageStream};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

struct Queue {
    tx: mpsc::UnboundedSender<Vec<u8>>,
    rx: Option<mpsc::UnboundedReceiver<Vec<u8>>>,
}

impl Queue {
    fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx: Some(rx) }
    }
}

#[derive(Clone, Default)]
pub struct FakeBroker {
    queues: Arc<Mutex<HashMap<String, Queue>>>,
}

struct FakeStream {
    rx: mpsc::UnboundedReceiver<Vec<u8>>,
}

#[async_trait::async_trait]
impl MessageStream for FakeStream {
    async fn recv(&mut self) -> Result<Option<Vec<u8>>, BrokerError> {
        Ok(self.rx.recv().await)
    }
}

#[async_trait::async_trait]
impl Broker for FakeBroker {
    async fn consume(&self, queue: &str) -> Result<Box<dyn MessageStream>, BrokerError> {
        let mut queues = self.queues.lock().await;
        let q = queues.entry(queue.to_string()).or_insert_with(Queue::new);
        let rx = q
            .rx
            .take()
            .ok_or_else(|| BrokerError::Transport(format!("queue {queue} already has a consumer")))?;
        Ok(Box::new(FakeStream { rx }))
    }

    async fn publish(&self, queue: &str, payload: &[u8]) -> Result<(), BrokerError> {
        let mut queues = self.queues.lock().await;
        let q = queues.entry(queue.to_string()).or_insert_with(Queue::new);
        q.tx
            .send(payload.to_vec())
            .map_err(|_| BrokerError::Transport(format!("queue {queue} consumer dropped")))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
