//! In-memory fleet supervisor for tests and local development.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{ensure_applicable, FleetSupervisor, SupervisorError};
use crate::models::{FleetCommand, WorkerState};

/// Fixed worker table mutated by accepted commands
///
/// ```rust
/// use scanfleet::fleet::{FleetSupervisor, InMemorySupervisor};
/// use scanfleet::models::{FleetCommand, WorkerState};
///
/// # tokio_test::block_on(async {
/// let supervisor = InMemorySupervisor::with_workers([("w1", WorkerState::Running)]);
/// supervisor.command(FleetCommand::Pause, "w1").await.unwrap();
///
/// let status = supervisor.status().await.unwrap();
/// assert_eq!(status["w1"], WorkerState::Paused);
/// # });
/// ```
#[derive(Debug, Default)]
pub struct InMemorySupervisor {
    workers: RwLock<HashMap<String, WorkerState>>,
    forwarded: RwLock<Vec<(FleetCommand, String)>>,
    forwarded_count: AtomicUsize,
    transport_failure: Option<String>,
    delay: Option<Duration>,
}

impl InMemorySupervisor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_workers<I, S>(workers: I) -> Self
    where
        I: IntoIterator<Item = (S, WorkerState)>,
        S: Into<String>,
    {
        Self {
            workers: RwLock::new(
                workers
                    .into_iter()
                    .map(|(name, state)| (name.into(), state))
                    .collect(),
            ),
            ..Self::default()
        }
    }

    /// Fail every call as if the broker were unreachable
    pub fn failing_with(mut self, message: impl Into<String>) -> Self {
        self.transport_failure = Some(message.into());
        self
    }

    /// Hold every call for `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Commands that reached the supervisor, in order
    pub async fn forwarded_commands(&self) -> Vec<(FleetCommand, String)> {
        self.forwarded.read().await.clone()
    }

    /// Number of `command` calls received, including rejected ones
    pub fn forwarded_count(&self) -> usize {
        self.forwarded_count.load(Ordering::SeqCst)
    }

    async fn check_transport(&self) -> Result<(), SupervisorError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.transport_failure {
            Some(message) => Err(SupervisorError::Transport(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl FleetSupervisor for InMemorySupervisor {
    async fn status(&self) -> Result<HashMap<String, WorkerState>, SupervisorError> {
        self.check_transport().await?;
        Ok(self.workers.read().await.clone())
    }

    async fn command(&self, command: FleetCommand, target: &str) -> Result<(), SupervisorError> {
        self.forwarded_count.fetch_add(1, Ordering::SeqCst);
        self.check_transport().await?;

        let mut workers = self.workers.write().await;
        let state = ensure_applicable(target, workers.get(target).copied(), command)?;
        workers.insert(target.to_string(), state.after(command));
        drop(workers);

        self.forwarded
            .write()
            .await
            .push((command, target.to_string()));
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "in_memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fleet() -> InMemorySupervisor {
        InMemorySupervisor::with_workers([
            ("w1", WorkerState::Running),
            ("w2", WorkerState::Paused),
        ])
    }

    #[tokio::test]
    async fn test_commands_follow_applicability_table() {
        let supervisor = fleet();

        supervisor.command(FleetCommand::Resume, "w2").await.unwrap();
        supervisor.command(FleetCommand::SoftShutdown, "w1").await.unwrap();

        let status = supervisor.status().await.unwrap();
        assert_eq!(status["w1"], WorkerState::ShuttingDown);
        assert_eq!(status["w2"], WorkerState::Running);

        let err = supervisor.command(FleetCommand::Pause, "w1").await.unwrap_err();
        assert!(matches!(err, SupervisorError::NotApplicable { .. }));

        supervisor.command(FleetCommand::HardShutdown, "w1").await.unwrap();
        assert_eq!(
            supervisor.status().await.unwrap()["w1"],
            WorkerState::Terminated
        );
    }

    #[tokio::test]
    async fn test_unknown_target_rejected() {
        let supervisor = fleet();
        let err = supervisor.command(FleetCommand::Pause, "ghost").await.unwrap_err();
        assert_eq!(
            err,
            SupervisorError::UnknownTarget {
                target: "ghost".to_string()
            }
        );
        assert!(supervisor.forwarded_commands().await.is_empty());
        assert_eq!(supervisor.forwarded_count(), 1);
    }

    #[tokio::test]
    async fn test_transport_failure() {
        let supervisor = fleet().failing_with("broker down");
        assert_eq!(
            supervisor.status().await,
            Err(SupervisorError::Transport("broker down".to_string()))
        );
    }

    #[tokio::test]
    async fn test_delay_holds_calls() {
        let supervisor = fleet().with_delay(Duration::from_millis(50));
        let started = std::time::Instant::now();

        supervisor.command(FleetCommand::Pause, "w1").await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(50));
        assert_eq!(supervisor.forwarded_count(), 1);
    }
}
