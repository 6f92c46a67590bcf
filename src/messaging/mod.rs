//! # Messaging Module
//!
//! RPC transport used to launch scan tasks on the remote worker pool.
//!
//! The [`RpcTransport`] trait is the seam the task dispatcher depends on;
//! [`providers`] holds the AMQP and in-memory implementations.

pub mod errors;
pub mod providers;
pub mod rpc;

pub use errors::MessagingError;
pub use providers::{AmqpRpcClient, InMemoryRpcTransport, RecordedInvocation};
pub use rpc::{RpcReply, RpcRequest, RpcTransport};
