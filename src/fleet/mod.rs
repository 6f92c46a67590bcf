//! # Fleet Supervisor
//!
//! Collaborator that knows the worker fleet: the last reported lifecycle
//! state of each worker, and how to deliver a lifecycle command to one of
//! them. The fleet commander validates command text and then forwards here.
//!
//! - [`AmqpSupervisor`] - heartbeats and commands over RabbitMQ
//! - [`InMemorySupervisor`] - fixed worker table for tests

mod amqp;
mod in_memory;

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{FleetCommand, WorkerState};

pub use amqp::{AmqpSupervisor, WorkerHeartbeat};
pub use in_memory::InMemorySupervisor;

/// Supervisor-side failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SupervisorError {
    #[error("Unknown worker '{target}'")]
    UnknownTarget { target: String },

    #[error("Command '{command}' is not applicable to worker '{target}' in state {state}")]
    NotApplicable {
        target: String,
        command: FleetCommand,
        state: WorkerState,
    },

    #[error("Supervisor transport failure: {0}")]
    Transport(String),
}

/// Worker fleet lifecycle operations
#[async_trait]
pub trait FleetSupervisor: Send + Sync + 'static {
    /// Current state of every known worker, keyed by worker id
    async fn status(&self) -> Result<HashMap<String, WorkerState>, SupervisorError>;

    /// Deliver `command` to the worker named `target`
    async fn command(&self, command: FleetCommand, target: &str) -> Result<(), SupervisorError>;

    /// Provider name for logging
    fn provider_name(&self) -> &'static str;
}

/// Check `command` against the last known state of `target`
pub(crate) fn ensure_applicable(
    target: &str,
    state: Option<WorkerState>,
    command: FleetCommand,
) -> Result<WorkerState, SupervisorError> {
    let state = state.ok_or_else(|| SupervisorError::UnknownTarget {
        target: target.to_string(),
    })?;
    if !state.accepts(command) {
        return Err(SupervisorError::NotApplicable {
            target: target.to_string(),
            command,
            state,
        });
    }
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_target() {
        assert_eq!(
            ensure_applicable("w9", None, FleetCommand::Pause),
            Err(SupervisorError::UnknownTarget {
                target: "w9".to_string()
            })
        );
    }

    #[test]
    fn test_not_applicable() {
        let err = ensure_applicable("w1", Some(WorkerState::Paused), FleetCommand::Pause)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Command 'pause' is not applicable to worker 'w1' in state paused"
        );
    }

    #[test]
    fn test_applicable_returns_current_state() {
        assert_eq!(
            ensure_applicable("w1", Some(WorkerState::Running), FleetCommand::SoftShutdown),
            Ok(WorkerState::Running)
        );
    }
}
