//! Error types for the scan fleet control plane.
//!
//! Caller-input faults ([`DecodeError`], [`FleetError::InvalidCommand`]) are
//! surfaced as 4xx responses; collaborator faults ([`StoreError`],
//! [`ControlError`]) as 5xx responses. Nothing here is retried.

use thiserror::Error;

/// Request payload could not be decoded into the expected shape
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Malformed JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Expected a JSON object, found {found}")]
    NotAnObject { found: &'static str },
}

/// Result store failure while preparing, executing or decoding a query
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Result query failed: {0}")]
    Query(#[from] sqlx::Error),

    #[error("Failed to decode column {column} of result row {row}: {message}")]
    Decode {
        row: usize,
        column: usize,
        message: String,
    },

    #[error("Result query exceeded deadline of {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
}

impl StoreError {
    pub fn decode(row: usize, column: usize, message: impl Into<String>) -> Self {
        Self::Decode {
            row,
            column,
            message: message.into(),
        }
    }
}

/// Fleet supervisor call failed at the transport level
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControlError {
    #[error("Fleet supervisor unavailable: {0}")]
    Unavailable(String),

    #[error("Fleet supervisor call exceeded deadline of {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
}

/// Fleet command failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FleetError {
    #[error("Invalid command '{command}' for target '{target}': {reason}")]
    InvalidCommand {
        target: String,
        command: String,
        reason: String,
    },

    #[error(transparent)]
    Control(#[from] ControlError),
}

impl FleetError {
    pub fn invalid_command(
        target: impl Into<String>,
        command: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidCommand {
            target: target.into(),
            command: command.into(),
            reason: reason.into(),
        }
    }

    pub fn is_invalid_command(&self) -> bool {
        matches!(self, Self::InvalidCommand { .. })
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
pub type FleetResult<T> = Result<T, FleetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_command_display() {
        let err = FleetError::invalid_command("w1", "nonsense", "unknown command");
        assert_eq!(
            err.to_string(),
            "Invalid command 'nonsense' for target 'w1': unknown command"
        );
        assert!(err.is_invalid_command());
    }

    #[test]
    fn test_control_error_is_not_invalid_command() {
        let err: FleetError = ControlError::Unavailable("broker down".to_string()).into();
        assert!(!err.is_invalid_command());
        assert_eq!(err.to_string(), "Fleet supervisor unavailable: broker down");
    }
}
