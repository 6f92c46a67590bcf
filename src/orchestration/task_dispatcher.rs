//! # Task Dispatcher
//!
//! Fire-and-forget launch of scan tasks on the worker pool.
//!
//! `submit` spawns one tokio task per submission and returns a receipt
//! straight away. The spawned unit owns the task, invokes the configured RPC
//! procedure and logs the outcome. Failures end there: the submitter has
//! already been answered and there is no status channel back to it.

use std::sync::Arc;

use tracing::{debug, info, Instrument};
use uuid::Uuid;

use crate::logging::log_unsurfaced_error;
use crate::messaging::{MessagingError, RpcTransport};
use crate::models::{DispatchReceipt, ScanTask};

/// Launches scan tasks through an [`RpcTransport`]
#[derive(Clone)]
pub struct TaskDispatcher {
    transport: Arc<dyn RpcTransport>,
    procedure: String,
}

impl std::fmt::Debug for TaskDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskDispatcher")
            .field("transport", &self.transport.provider_name())
            .field("procedure", &self.procedure)
            .finish()
    }
}

impl TaskDispatcher {
    pub fn new(transport: Arc<dyn RpcTransport>, procedure: impl Into<String>) -> Self {
        Self {
            transport,
            procedure: procedure.into(),
        }
    }

    pub fn procedure(&self) -> &str {
        &self.procedure
    }

    /// Launch `task` in the background and return without waiting for it
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit(&self, task: ScanTask) -> DispatchReceipt {
        let receipt = DispatchReceipt::new();
        let dispatch_id = receipt.dispatch_id;
        let transport = Arc::clone(&self.transport);
        let procedure = self.procedure.clone();

        let span = tracing::info_span!("dispatch", dispatch_id = %dispatch_id, procedure = %procedure);
        tokio::spawn(
            async move {
                match transport.invoke(&procedure, task.into_value()).await {
                    Ok(reply) => {
                        info!("✅ Scan task dispatched");
                        debug!(reply = %reply, "Worker reply");
                    }
                    Err(error) => report_failure(dispatch_id, &procedure, &error),
                }
            }
            .instrument(span),
        );

        debug!(dispatch_id = %dispatch_id, "Scan task accepted for dispatch");
        receipt
    }
}

fn report_failure(dispatch_id: Uuid, procedure: &str, error: &MessagingError) {
    let context = format!("dispatch_id={dispatch_id} procedure={procedure}");
    log_unsurfaced_error("task_dispatcher", "dispatch", &error.to_string(), Some(&context));
}
