//! # RabbitMQ RPC Client
//!
//! AMQP 0.9.1 implementation of [`RpcTransport`] using the `lapin` crate.
//!
//! ## Protocol
//!
//! - Requests are published to the configured exchange with the request queue
//!   as routing key, as JSON `{"method", "payload"}`.
//! - Each request carries a fresh `correlation_id` and `reply_to` naming this
//!   client's reply queue.
//! - A background consumer routes replies (`{"result"}` or `{"error"}`) back
//!   to the waiting invocation by correlation id.
//! - An invocation with no reply within `reply_timeout_seconds` fails with
//!   [`MessagingError::Timeout`]; a late reply is dropped.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use futures::StreamExt;
use lapin::options::{
    BasicConsumeOptions, BasicPublishOptions, ExchangeDeclareOptions, QueueBindOptions,
    QueueDeclareOptions,
};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties, Consumer, ExchangeKind};
use serde_json::Value;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::RpcConfig;
use crate::messaging::rpc::{RpcReply, RpcRequest, RpcTransport};
use crate::messaging::MessagingError;

type PendingReplies = DashMap<String, oneshot::Sender<Result<RpcReply, MessagingError>>>;

/// RabbitMQ-based RPC client
#[derive(Debug)]
pub struct AmqpRpcClient {
    connection: Connection,
    channel: Channel,
    config: RpcConfig,
    delivery_mode: u8,
    reply_queue: String,
    /// Invocations waiting for a reply, keyed by correlation id
    pending: Arc<PendingReplies>,
    reply_consumer: JoinHandle<()>,
}

impl AmqpRpcClient {
    /// Connect, declare the request topology and start consuming replies
    pub async fn connect(config: &RpcConfig) -> Result<Self, MessagingError> {
        let delivery_mode = config.delivery_mode_code()?;

        let connection = Connection::connect(
            &config.url,
            ConnectionProperties::default().with_connection_name("scanfleet-rpc".into()),
        )
        .await
        .map_err(|e| MessagingError::connection(format!("RabbitMQ connection failed: {e}")))?;

        let channel = connection.create_channel().await.map_err(|e| {
            MessagingError::connection(format!("RabbitMQ channel creation failed: {e}"))
        })?;

        declare_request_topology(&channel, config).await?;

        let reply_queue = channel
            .queue_declare(
                &config.reply_queue,
                QueueDeclareOptions {
                    exclusive: true,
                    auto_delete: true,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await
            .map_err(|e| {
                MessagingError::queue_operation(&config.reply_queue, "declare", e.to_string())
            })?
            .name()
            .as_str()
            .to_string();

        let consumer = channel
            .basic_consume(
                &reply_queue,
                "scanfleet-rpc-replies",
                BasicConsumeOptions {
                    no_ack: true,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await
            .map_err(|e| MessagingError::queue_operation(&reply_queue, "consume", e.to_string()))?;

        let pending: Arc<PendingReplies> = Arc::new(DashMap::new());
        let reply_consumer = tokio::spawn(route_replies(consumer, Arc::clone(&pending)));

        info!(
            exchange = %config.exchange,
            request_queue = %config.request_queue,
            reply_queue = %reply_queue,
            "📡 RPC client connected"
        );

        Ok(Self {
            connection,
            channel,
            config: config.clone(),
            delivery_mode,
            reply_queue,
            pending,
            reply_consumer,
        })
    }

    pub fn reply_queue(&self) -> &str {
        &self.reply_queue
    }

    /// Number of invocations still waiting for a reply
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Stop consuming replies and close the broker connection
    pub async fn close(&self) -> Result<(), MessagingError> {
        self.reply_consumer.abort();
        self.channel
            .close(200, "OK")
            .await
            .map_err(|e| MessagingError::connection(format!("Channel close failed: {e}")))?;
        self.connection
            .close(200, "OK")
            .await
            .map_err(|e| MessagingError::connection(format!("Connection close failed: {e}")))
    }

    async fn publish(&self, correlation_id: &str, body: &[u8]) -> Result<(), MessagingError> {
        let destination = format!("{}/{}", self.config.exchange, self.config.request_queue);
        let confirm = self
            .channel
            .basic_publish(
                &self.config.exchange,
                &self.config.request_queue,
                BasicPublishOptions::default(),
                body,
                BasicProperties::default()
                    .with_delivery_mode(self.delivery_mode)
                    .with_content_type("application/json".into())
                    .with_correlation_id(correlation_id.to_string().into())
                    .with_reply_to(self.reply_queue.clone().into()),
            )
            .await
            .map_err(|e| MessagingError::publish(&destination, e.to_string()))?;

        confirm
            .await
            .map_err(|e| MessagingError::publish(&destination, format!("confirmation failed: {e}")))?;
        Ok(())
    }
}

impl Drop for AmqpRpcClient {
    fn drop(&mut self) {
        self.reply_consumer.abort();
    }
}

#[async_trait]
impl RpcTransport for AmqpRpcClient {
    async fn invoke(&self, procedure: &str, payload: Value) -> Result<Value, MessagingError> {
        let body = RpcRequest::new(procedure, payload).to_bytes()?;
        let correlation_id = Uuid::new_v4().to_string();

        let (reply_tx, reply_rx) = oneshot::channel();
        self.pending.insert(correlation_id.clone(), reply_tx);

        if let Err(e) = self.publish(&correlation_id, &body).await {
            self.pending.remove(&correlation_id);
            return Err(e);
        }
        debug!(procedure = %procedure, correlation_id = %correlation_id, "RPC request published");

        match tokio::time::timeout(self.config.reply_timeout(), reply_rx).await {
            Ok(Ok(reply)) => reply?.into_result(procedure),
            Ok(Err(_)) => Err(MessagingError::closed("reply consumer stopped")),
            Err(_) => {
                self.pending.remove(&correlation_id);
                Err(MessagingError::timeout(
                    format!("invoke {procedure}"),
                    self.config.reply_timeout_seconds,
                ))
            }
        }
    }

    fn provider_name(&self) -> &'static str {
        "rabbitmq"
    }
}

async fn declare_request_topology(
    channel: &Channel,
    config: &RpcConfig,
) -> Result<(), MessagingError> {
    channel
        .exchange_declare(
            &config.exchange,
            exchange_kind(&config.exchange_type),
            ExchangeDeclareOptions {
                durable: true,
                ..Default::default()
            },
            FieldTable::default(),
        )
        .await
        .map_err(|e| MessagingError::queue_operation(&config.exchange, "declare exchange", e.to_string()))?;

    channel
        .queue_declare(
            &config.request_queue,
            QueueDeclareOptions {
                durable: true,
                ..Default::default()
            },
            FieldTable::default(),
        )
        .await
        .map_err(|e| MessagingError::queue_operation(&config.request_queue, "declare", e.to_string()))?;

    channel
        .queue_bind(
            &config.request_queue,
            &config.exchange,
            &config.request_queue,
            QueueBindOptions::default(),
            FieldTable::default(),
        )
        .await
        .map_err(|e| MessagingError::queue_operation(&config.request_queue, "bind", e.to_string()))
}

/// Map a configured exchange type onto the AMQP exchange kind
fn exchange_kind(exchange_type: &str) -> ExchangeKind {
    match exchange_type {
        "direct" => ExchangeKind::Direct,
        "fanout" => ExchangeKind::Fanout,
        "topic" => ExchangeKind::Topic,
        "headers" => ExchangeKind::Headers,
        other => ExchangeKind::Custom(other.to_string()),
    }
}

/// Deliver each reply to the invocation waiting on its correlation id
async fn route_replies(mut consumer: Consumer, pending: Arc<PendingReplies>) {
    while let Some(delivery) = consumer.next().await {
        let delivery = match delivery {
            Ok(delivery) => delivery,
            Err(e) => {
                warn!(error = %e, "RPC reply consumer failed");
                break;
            }
        };

        let Some(correlation_id) = delivery
            .properties
            .correlation_id()
            .as_ref()
            .map(|id| id.as_str().to_string())
        else {
            warn!("Dropping RPC reply without correlation id");
            continue;
        };

        match pending.remove(&correlation_id) {
            Some((_, waiter)) => {
                // The waiter may have timed out between remove and send
                let _ = waiter.send(RpcReply::from_bytes(&delivery.data));
            }
            None => debug!(correlation_id = %correlation_id, "Dropping late RPC reply"),
        }
    }

    // Fail everything still waiting so callers do not sit out their timeout
    let waiting: Vec<String> = pending.iter().map(|entry| entry.key().clone()).collect();
    for correlation_id in waiting {
        if let Some((_, waiter)) = pending.remove(&correlation_id) {
            let _ = waiter.send(Err(MessagingError::closed("reply queue consumer ended")));
        }
    }
}
