//! # AMQP Fleet Supervisor
//!
//! Workers publish heartbeats `{"worker": "<id>", "state": "<state>"}` to the
//! status queue. Commands go out as `{"command": "<literal>"}` on the command
//! exchange with the worker id as routing key, so each worker binds its own
//! control queue under its name.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use futures::StreamExt;
use lapin::options::{
    BasicConsumeOptions, BasicPublishOptions, ExchangeDeclareOptions, QueueDeclareOptions,
};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties, Consumer, ExchangeKind};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{ensure_applicable, FleetSupervisor, SupervisorError};
use crate::config::SupervisorConfig;
use crate::constants::delivery_mode;
use crate::models::{FleetCommand, WorkerState};

/// Heartbeat published by a worker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerHeartbeat {
    pub worker: String,
    pub state: WorkerState,
}

#[derive(Debug, Clone, Copy)]
struct WorkerRecord {
    state: WorkerState,
    last_seen: Instant,
}

type WorkerTable = DashMap<String, WorkerRecord>;

/// RabbitMQ-backed fleet supervisor
#[derive(Debug)]
pub struct AmqpSupervisor {
    connection: Connection,
    channel: Channel,
    config: SupervisorConfig,
    workers: Arc<WorkerTable>,
    heartbeat_consumer: JoinHandle<()>,
}

impl AmqpSupervisor {
    pub async fn connect(config: &SupervisorConfig) -> Result<Self, SupervisorError> {
        let connection = Connection::connect(
            &config.url,
            ConnectionProperties::default().with_connection_name("scanfleet-supervisor".into()),
        )
        .await
        .map_err(|e| transport("connect", e))?;

        let channel = connection
            .create_channel()
            .await
            .map_err(|e| transport("create channel", e))?;

        channel
            .exchange_declare(
                &config.command_exchange,
                ExchangeKind::Direct,
                ExchangeDeclareOptions {
                    durable: true,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await
            .map_err(|e| transport("declare command exchange", e))?;

        channel
            .queue_declare(
                &config.status_queue,
                QueueDeclareOptions {
                    durable: true,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await
            .map_err(|e| transport("declare status queue", e))?;

        let consumer = channel
            .basic_consume(
                &config.status_queue,
                "scanfleet-supervisor",
                BasicConsumeOptions {
                    no_ack: true,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await
            .map_err(|e| transport("consume status queue", e))?;

        let workers: Arc<WorkerTable> = Arc::new(DashMap::new());
        let heartbeat_consumer = tokio::spawn(consume_heartbeats(consumer, Arc::clone(&workers)));

        info!(
            command_exchange = %config.command_exchange,
            status_queue = %config.status_queue,
            "🛰️ Fleet supervisor connected"
        );

        Ok(Self {
            connection,
            channel,
            config: config.clone(),
            workers,
            heartbeat_consumer,
        })
    }

    pub async fn close(&self) -> Result<(), SupervisorError> {
        self.heartbeat_consumer.abort();
        self.channel
            .close(200, "OK")
            .await
            .map_err(|e| transport("close channel", e))?;
        self.connection
            .close(200, "OK")
            .await
            .map_err(|e| transport("close connection", e))
    }
}

impl Drop for AmqpSupervisor {
    fn drop(&mut self) {
        self.heartbeat_consumer.abort();
    }
}

#[async_trait]
impl FleetSupervisor for AmqpSupervisor {
    async fn status(&self) -> Result<HashMap<String, WorkerState>, SupervisorError> {
        prune_expired(&self.workers, self.config.worker_ttl());
        Ok(live_workers(&self.workers, self.config.worker_ttl()))
    }

    async fn command(&self, command: FleetCommand, target: &str) -> Result<(), SupervisorError> {
        let known = live_workers(&self.workers, self.config.worker_ttl())
            .get(target)
            .copied();
        ensure_applicable(target, known, command)?;

        let body = serde_json::to_vec(&serde_json::json!({ "command": command.as_str() }))
            .map_err(|e| SupervisorError::Transport(e.to_string()))?;

        self.channel
            .basic_publish(
                &self.config.command_exchange,
                target,
                BasicPublishOptions::default(),
                &body,
                BasicProperties::default()
                    .with_delivery_mode(delivery_mode::TRANSIENT)
                    .with_content_type("application/json".into()),
            )
            .await
            .map_err(|e| transport("publish command", e))?
            .await
            .map_err(|e| transport("confirm command", e))?;

        debug!(target = %target, command = %command, "Fleet command published");
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "rabbitmq"
    }
}

fn transport(operation: &str, error: lapin::Error) -> SupervisorError {
    SupervisorError::Transport(format!("{operation}: {error}"))
}

async fn consume_heartbeats(mut consumer: Consumer, workers: Arc<WorkerTable>) {
    while let Some(delivery) = consumer.next().await {
        match delivery {
            Ok(delivery) => {
                if let Err(e) = record_heartbeat(&workers, &delivery.data, Instant::now()) {
                    warn!(error = %e, "Dropping malformed worker heartbeat");
                }
            }
            Err(e) => {
                warn!(error = %e, "Heartbeat consumer failed");
                break;
            }
        }
    }
}

fn record_heartbeat(
    workers: &WorkerTable,
    bytes: &[u8],
    seen_at: Instant,
) -> Result<(), serde_json::Error> {
    let heartbeat: WorkerHeartbeat = serde_json::from_slice(bytes)?;
    workers.insert(
        heartbeat.worker,
        WorkerRecord {
            state: heartbeat.state,
            last_seen: seen_at,
        },
    );
    Ok(())
}

/// Drop workers not heard from within `ttl`
fn prune_expired(workers: &WorkerTable, ttl: Duration) {
    workers.retain(|_, record| record.last_seen.elapsed() <= ttl);
}

/// Workers heard from within `ttl`
fn live_workers(workers: &WorkerTable, ttl: Duration) -> HashMap<String, WorkerState> {
    workers
        .iter()
        .filter(|entry| entry.value().last_seen.elapsed() <= ttl)
        .map(|entry| (entry.key().clone(), entry.value().state))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heartbeat_updates_state() {
        let workers = WorkerTable::new();
        let now = Instant::now();
        record_heartbeat(&workers, br#"{"worker":"w1","state":"running"}"#, now).unwrap();
        record_heartbeat(&workers, br#"{"worker":"w1","state":"paused"}"#, now).unwrap();

        let live = live_workers(&workers, Duration::from_secs(30));
        assert_eq!(live.len(), 1);
        assert_eq!(live["w1"], WorkerState::Paused);
    }

    #[test]
    fn test_malformed_heartbeat_rejected() {
        let workers = WorkerTable::new();
        assert!(record_heartbeat(&workers, br#"{"worker":"w1","state":"asleep"}"#, Instant::now()).is_err());
        assert!(workers.is_empty());
    }

    #[test]
    fn test_stale_workers_are_hidden() {
        let workers = WorkerTable::new();
        let now = Instant::now();
        record_heartbeat(&workers, br#"{"worker":"fresh","state":"running"}"#, now).unwrap();
        if let Some(stale) = now.checked_sub(Duration::from_secs(120)) {
            record_heartbeat(&workers, br#"{"worker":"stale","state":"running"}"#, stale).unwrap();
        }

        let live = live_workers(&workers, Duration::from_secs(30));
        assert!(live.contains_key("fresh"));
        assert!(!live.contains_key("stale"));
    }

    #[test]
    fn test_expired_workers_are_pruned() {
        let workers = WorkerTable::new();
        let now = Instant::now();
        record_heartbeat(&workers, br#"{"worker":"fresh","state":"running"}"#, now).unwrap();
        let Some(stale) = now.checked_sub(Duration::from_secs(120)) else {
            return;
        };
        for worker in ["gone-1", "gone-2"] {
            let heartbeat = format!(r#"{{"worker":"{worker}","state":"paused"}}"#);
            record_heartbeat(&workers, heartbeat.as_bytes(), stale).unwrap();
        }
        assert_eq!(workers.len(), 3);

        prune_expired(&workers, Duration::from_secs(30));
        assert_eq!(workers.len(), 1);
        assert!(workers.contains_key("fresh"));
    }

    #[test]
    fn test_heartbeat_wire_format() {
        let heartbeat = WorkerHeartbeat {
            worker: "w2".to_string(),
            state: WorkerState::ShuttingDown,
        };
        assert_eq!(
            serde_json::to_value(&heartbeat).unwrap(),
            serde_json::json!({"worker": "w2", "state": "shutting-down"})
        );
    }
}
