// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! RabbitMQ realization via `lapin`.

use crate::{with_publish_timeout, Broker, BrokerError, MessageStream};
use async_trait::async_trait;
use futures::StreamExt;
use lapin::options::{BasicConsumeOptions, BasicPublishOptions, QueueDeclareOptions};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties, Consumer};

/// Queues declared here are non-durable, non-exclusive, with no
/// `no-local` flag, exactly as §6 requires — they exist only for the
/// lifetime of the worker or Entry process that owns them.
fn ephemeral_queue_options() -> QueueDeclareOptions {
    QueueDeclareOptions {
        durable: false,
        exclusive: false,
        auto_delete: true,
        ..QueueDeclareOptions::default()
    }
}

pub struct RabbitMqBroker {
    channel: Channel,
    _connection: Connection,
}

impl RabbitMqBroker {
    pub async fn connect(addr: &str) -> Result<Self, BrokerError> {
        let connection = Connection::connect(addr, ConnectionProperties::default())
            .await
            .map_err(|e| BrokerError::Transport(e.to_string()))?;
        let channel = connection
            .create_channel()
            .await
            .map_err(|e| BrokerError::Transport(e.to_string()))?;
        Ok(Self { channel, _connection: connection })
    }

    async fn declare(&self, name: &str) -> Result<(), BrokerError> {
        self.channel
            .queue_declare(name, ephemeral_queue_options(), FieldTable::default())
            .await
            .map_err(|e| BrokerError::Transport(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl Broker for RabbitMqBroker {
    async fn consume(&self, queue: &str) -> Result<Box<dyn MessageStream>, BrokerError> {
        self.declare(queue).await?;
        let consumer = self
            .channel
            .basic_consume(
                queue,
                &format!("{queue}-consumer"),
                BasicConsumeOptions { no_ack: true, ..BasicConsumeOptions::default() },
                FieldTable::default(),
            )
            .await
            .map_err(|e| BrokerError::Transport(e.to_string()))?;
        Ok(Box::new(LapinStream { consumer }))
    }

    async fn publish(&self, queue: &str, payload: &[u8]) -> Result<(), BrokerError> {
        self.declare(queue).await?;
        with_publish_timeout(async {
            self.channel
                .basic_publish(
                    "",
                    queue,
                    BasicPublishOptions::default(),
                    payload,
                    BasicProperties::default(),
                )
                .await
                .map_err(|e| BrokerError::Transport(e.to_string()))?
                .await
                .map_err(|e| BrokerError::Transport(e.to_string()))?;
            Ok(())
        })
        .await
    }
}

/// Adapts a `lapin::Consumer` (a `futures::Stream` of raw deliveries) to
/// [`MessageStream`] by forwarding each delivery's body unparsed.
struct LapinStream {
    consumer: Consumer,
}

#[async_trait]
impl MessageStream for LapinStream {
    async fn recv(&mut self) -> Result<Option<Vec<u8>>, BrokerError> {
        match self.consumer.next().await {
            None => Ok(None),
            Some(Err(e)) => Err(BrokerError::Transport(e.to_string())),
            Some(Ok(delivery)) => Ok(Some(delivery.data)),
        }
    }
}
