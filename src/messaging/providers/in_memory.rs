//! # In-Memory RPC Transport
//!
//! Records every invocation and answers with a canned reply. Supports an
//! artificial delay and a forced failure so tests can observe detached
//! dispatch and failure logging without a broker.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::{Notify, RwLock};

use crate::messaging::rpc::RpcTransport;
use crate::messaging::MessagingError;

/// One call observed by the transport
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedInvocation {
    pub procedure: String,
    pub payload: Value,
    pub received_at: DateTime<Utc>,
}

/// In-memory RPC transport for testing
///
/// # Example
///
/// ```rust
/// use scanfleet::messaging::{InMemoryRpcTransport, RpcTransport};
/// use serde_json::json;
///
/// # tokio_test::block_on(async {
/// let transport = InMemoryRpcTransport::new().with_reply(json!({"accepted": true}));
/// let reply = transport.invoke("scan", json!({"target": "10.0.0.1"})).await.unwrap();
///
/// assert_eq!(reply, json!({"accepted": true}));
/// assert_eq!(transport.invocations().await.len(), 1);
/// # });
/// ```
#[derive(Debug)]
pub struct InMemoryRpcTransport {
    invocations: RwLock<Vec<RecordedInvocation>>,
    reply: Value,
    delay: Option<Duration>,
    failure: Option<MessagingError>,
    completed: AtomicUsize,
    completion: Notify,
}

impl Default for InMemoryRpcTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRpcTransport {
    pub fn new() -> Self {
        Self {
            invocations: RwLock::new(Vec::new()),
            reply: Value::Null,
            delay: None,
            failure: None,
            completed: AtomicUsize::new(0),
            completion: Notify::new(),
        }
    }

    /// Value returned from every successful invocation
    pub fn with_reply(mut self, reply: Value) -> Self {
        self.reply = reply;
        self
    }

    /// Sleep this long inside every invocation before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Fail every invocation with `error`
    pub fn failing_with(mut self, error: MessagingError) -> Self {
        self.failure = Some(error);
        self
    }

    /// Invocations received so far, in arrival order
    pub async fn invocations(&self) -> Vec<RecordedInvocation> {
        self.invocations.read().await.clone()
    }

    /// Number of invocations that have finished (successfully or not)
    pub fn completed_count(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Wait until at least `expected` invocations have finished
    pub async fn wait_for_completions(&self, expected: usize) {
        loop {
            let notified = self.completion.notified();
            if self.completed_count() >= expected {
                return;
            }
            notified.await;
        }
    }

    fn finish(&self) {
        self.completed.fetch_add(1, Ordering::SeqCst);
        self.completion.notify_waiters();
    }
}

#[async_trait]
impl RpcTransport for InMemoryRpcTransport {
    async fn invoke(&self, procedure: &str, payload: Value) -> Result<Value, MessagingError> {
        self.invocations.write().await.push(RecordedInvocation {
            procedure: procedure.to_string(),
            payload,
            received_at: Utc::now(),
        });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let outcome = match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(self.reply.clone()),
        };
        self.finish();
        outcome
    }

    fn provider_name(&self) -> &'static str {
        "in_memory"
    }
}
