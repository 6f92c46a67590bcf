//! Fleet lifecycle types shared by the commander and the supervisor providers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Lifecycle command sent to a named worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FleetCommand {
    /// Finish in-flight work, then stop
    SoftShutdown,
    /// Stop immediately
    HardShutdown,
    Pause,
    Resume,
}

/// Command text did not match any known literal
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown fleet command: '{0}'")]
pub struct UnknownCommand(pub String);

impl FleetCommand {
    pub const ALL: [FleetCommand; 4] = [
        FleetCommand::SoftShutdown,
        FleetCommand::HardShutdown,
        FleetCommand::Pause,
        FleetCommand::Resume,
    ];

    /// Wire literal of the command
    pub fn as_str(&self) -> &'static str {
        match self {
            FleetCommand::SoftShutdown => "softshutdown",
            FleetCommand::HardShutdown => "hardshutdown",
            FleetCommand::Pause => "pause",
            FleetCommand::Resume => "resume",
        }
    }
}

impl FromStr for FleetCommand {
    type Err = UnknownCommand;

    /// Exact, case-sensitive match; there is no fallback variant
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "softshutdown" => Ok(FleetCommand::SoftShutdown),
            "hardshutdown" => Ok(FleetCommand::HardShutdown),
            "pause" => Ok(FleetCommand::Pause),
            "resume" => Ok(FleetCommand::Resume),
            other => Err(UnknownCommand(other.to_string())),
        }
    }
}

impl fmt::Display for FleetCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Worker lifecycle state as reported by the fleet supervisor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkerState {
    Running,
    Paused,
    ShuttingDown,
    Terminated,
}

impl WorkerState {
    /// Whether `command` is meaningful for a worker currently in this state
    pub fn accepts(&self, command: FleetCommand) -> bool {
        use FleetCommand::*;
        match self {
            WorkerState::Running => matches!(command, Pause | SoftShutdown | HardShutdown),
            WorkerState::Paused => matches!(command, Resume | SoftShutdown | HardShutdown),
            WorkerState::ShuttingDown => command == HardShutdown,
            WorkerState::Terminated => false,
        }
    }

    /// State a worker is expected to reach after accepting `command`
    pub fn after(&self, command: FleetCommand) -> WorkerState {
        match command {
            FleetCommand::Pause => WorkerState::Paused,
            FleetCommand::Resume => WorkerState::Running,
            FleetCommand::SoftShutdown => WorkerState::ShuttingDown,
            FleetCommand::HardShutdown => WorkerState::Terminated,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkerState::Running => "running",
            WorkerState::Paused => "paused",
            WorkerState::ShuttingDown => "shutting-down",
            WorkerState::Terminated => "terminated",
        }
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fleet command payload accepted by `POST /status`
///
/// Keys are `Target` and `Command`; the all-lowercase spellings are accepted
/// as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRequest {
    #[serde(rename = "Target", alias = "target")]
    pub target: String,
    #[serde(rename = "Command", alias = "command")]
    pub command: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_literals_round_trip() {
        for command in FleetCommand::ALL {
            assert_eq!(command.as_str().parse::<FleetCommand>().unwrap(), command);
        }
    }

    #[test]
    fn test_unknown_command_is_rejected() {
        assert_eq!(
            "nonsense".parse::<FleetCommand>(),
            Err(UnknownCommand("nonsense".to_string()))
        );
        assert!("Pause".parse::<FleetCommand>().is_err());
        assert!("".parse::<FleetCommand>().is_err());
        assert!("soft-shutdown".parse::<FleetCommand>().is_err());
    }

    #[test]
    fn test_state_applicability() {
        assert!(WorkerState::Running.accepts(FleetCommand::Pause));
        assert!(!WorkerState::Running.accepts(FleetCommand::Resume));
        assert!(WorkerState::Paused.accepts(FleetCommand::Resume));
        assert!(!WorkerState::Paused.accepts(FleetCommand::Pause));
        assert!(WorkerState::ShuttingDown.accepts(FleetCommand::HardShutdown));
        assert!(!WorkerState::ShuttingDown.accepts(FleetCommand::SoftShutdown));
        for command in FleetCommand::ALL {
            assert!(!WorkerState::Terminated.accepts(command));
        }
    }

    #[test]
    fn test_state_serialization() {
        assert_eq!(
            serde_json::to_string(&WorkerState::ShuttingDown).unwrap(),
            "\"shutting-down\""
        );
        let state: WorkerState = serde_json::from_str("\"paused\"").unwrap();
        assert_eq!(state, WorkerState::Paused);
    }

    #[test]
    fn test_command_request_field_names() {
        let request: CommandRequest =
            serde_json::from_str(r#"{"Target":"worker-1","Command":"pause"}"#).unwrap();
        assert_eq!(request.target, "worker-1");
        assert_eq!(request.command, "pause");

        let lowercase: CommandRequest =
            serde_json::from_str(r#"{"target":"worker-1","command":"resume"}"#).unwrap();
        assert_eq!(lowercase.target, "worker-1");
        assert_eq!(lowercase.command, "resume");
    }
}
