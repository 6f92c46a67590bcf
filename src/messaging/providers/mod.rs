//! # RPC Transport Providers
//!
//! - [`AmqpRpcClient`] - RabbitMQ via the lapin crate
//! - [`InMemoryRpcTransport`] - Recording transport for tests and local runs

mod in_memory;
mod rabbitmq;

pub use in_memory::{InMemoryRpcTransport, RecordedInvocation};
pub use rabbitmq::AmqpRpcClient;
