//! # Fleet Commander
//!
//! Validates operator lifecycle commands and forwards them to the fleet
//! supervisor; exposes the supervisor's worker status map unchanged.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::{ControlError, FleetError, FleetResult};
use crate::fleet::{FleetSupervisor, SupervisorError};
use crate::models::{FleetCommand, UnknownCommand, WorkerState};

#[derive(Clone)]
pub struct FleetCommander {
    supervisor: Arc<dyn FleetSupervisor>,
}

impl std::fmt::Debug for FleetCommander {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FleetCommander")
            .field("supervisor", &self.supervisor.provider_name())
            .finish()
    }
}

impl FleetCommander {
    pub fn new(supervisor: Arc<dyn FleetSupervisor>) -> Self {
        Self { supervisor }
    }

    /// Worker id to lifecycle state, as reported by the supervisor
    pub async fn status(&self) -> Result<HashMap<String, WorkerState>, ControlError> {
        self.supervisor.status().await.map_err(|e| {
            warn!(error = %e, "Fleet status request failed");
            ControlError::Unavailable(e.to_string())
        })
    }

    pub async fn status_with_deadline(
        &self,
        deadline: Duration,
    ) -> Result<HashMap<String, WorkerState>, ControlError> {
        tokio::time::timeout(deadline, self.status())
            .await
            .map_err(|_| ControlError::Timeout {
                timeout_ms: millis(deadline),
            })?
    }

    /// Parse `command_text` and forward it to `target`
    ///
    /// Text that is not one of the four command literals is rejected without
    /// contacting the supervisor.
    pub async fn command(&self, target: &str, command_text: &str) -> FleetResult<()> {
        let command: FleetCommand = command_text
            .parse()
            .map_err(|e: UnknownCommand| {
                FleetError::invalid_command(target, command_text, e.to_string())
            })?;

        match self.supervisor.command(command, target).await {
            Ok(()) => {
                info!(target = %target, command = %command, "📣 Fleet command forwarded");
                Ok(())
            }
            Err(e @ (SupervisorError::UnknownTarget { .. } | SupervisorError::NotApplicable { .. })) => {
                warn!(target = %target, command = %command, error = %e, "Fleet command rejected");
                Err(FleetError::invalid_command(target, command_text, e.to_string()))
            }
            Err(SupervisorError::Transport(message)) => {
                Err(FleetError::Control(ControlError::Unavailable(message)))
            }
        }
    }

    pub async fn command_with_deadline(
        &self,
        target: &str,
        command_text: &str,
        deadline: Duration,
    ) -> FleetResult<()> {
        tokio::time::timeout(deadline, self.command(target, command_text))
            .await
            .map_err(|_| {
                FleetError::Control(ControlError::Timeout {
                    timeout_ms: millis(deadline),
                })
            })?
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet::InMemorySupervisor;

    fn commander() -> (FleetCommander, Arc<InMemorySupervisor>) {
        let supervisor = Arc::new(InMemorySupervisor::with_workers([
            ("w1", WorkerState::Running),
            ("w2", WorkerState::Paused),
        ]));
        (FleetCommander::new(supervisor.clone()), supervisor)
    }

    #[tokio::test]
    async fn test_pause_is_forwarded() {
        let (commander, supervisor) = commander();
        commander.command("w1", "pause").await.unwrap();

        assert_eq!(
            supervisor.forwarded_commands().await,
            vec![(FleetCommand::Pause, "w1".to_string())]
        );
    }

    #[tokio::test]
    async fn test_unknown_command_is_never_forwarded() {
        let (commander, supervisor) = commander();

        for text in ["nonsense", "", "Pause", "PAUSE", "soft-shutdown"] {
            let err = commander.command("w1", text).await.unwrap_err();
            assert!(err.is_invalid_command(), "{text:?} should be rejected");
        }
        assert_eq!(supervisor.forwarded_count(), 0);
    }

    #[tokio::test]
    async fn test_supervisor_rejections_are_invalid_commands() {
        let (commander, _) = commander();

        assert!(commander
            .command("ghost", "pause")
            .await
            .unwrap_err()
            .is_invalid_command());
        assert!(commander
            .command("w2", "pause")
            .await
            .unwrap_err()
            .is_invalid_command());
    }

    #[tokio::test]
    async fn test_transport_failure_is_control_error() {
        let supervisor = Arc::new(InMemorySupervisor::new().failing_with("broker down"));
        let commander = FleetCommander::new(supervisor);

        let err = commander.command("w1", "resume").await.unwrap_err();
        assert_eq!(
            err,
            FleetError::Control(ControlError::Unavailable("broker down".to_string()))
        );
        assert!(matches!(
            commander.status().await,
            Err(ControlError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_status_is_stable_without_commands() {
        let (commander, _) = commander();
        let first = commander.status().await.unwrap();
        let second = commander.status().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first["w1"], WorkerState::Running);
        assert_eq!(first["w2"], WorkerState::Paused);
    }

    #[tokio::test]
    async fn test_status_deadline() {
        let (commander, _) = commander();
        let status = commander
            .status_with_deadline(Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(status.len(), 2);
    }

    #[tokio::test]
    async fn test_slow_supervisor_times_out() {
        let supervisor = Arc::new(
            InMemorySupervisor::with_workers([("w1", WorkerState::Running)])
                .with_delay(Duration::from_millis(500)),
        );
        let commander = FleetCommander::new(supervisor);
        let deadline = Duration::from_millis(20);

        assert_eq!(
            commander.status_with_deadline(deadline).await,
            Err(ControlError::Timeout { timeout_ms: 20 })
        );
        assert_eq!(
            commander.command_with_deadline("w1", "pause", deadline).await,
            Err(FleetError::Control(ControlError::Timeout { timeout_ms: 20 }))
        );
    }

    #[tokio::test]
    async fn test_invalid_command_rejected_before_deadline_applies() {
        let supervisor = Arc::new(InMemorySupervisor::new().with_delay(Duration::from_secs(5)));
        let commander = FleetCommander::new(supervisor.clone());

        let err = commander
            .command_with_deadline("w1", "reboot", Duration::from_millis(20))
            .await
            .unwrap_err();
        assert!(err.is_invalid_command());
        assert_eq!(supervisor.forwarded_count(), 0);
    }
}
