use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::DecodeError;

/// A scan task as submitted by API callers
///
/// The task's fields belong to the worker contract; the control plane only
/// requires a JSON object and forwards it untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScanTask(Map<String, Value>);

impl ScanTask {
    /// Decode a request body into a task
    pub fn from_slice(bytes: &[u8]) -> Result<Self, DecodeError> {
        match serde_json::from_slice::<Value>(bytes)? {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(DecodeError::NotAnObject {
                found: json_kind(&other),
            }),
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// Acknowledgement returned once a task has been handed off for dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchReceipt {
    /// Correlates log lines of the detached dispatch
    pub dispatch_id: Uuid,
}

impl DispatchReceipt {
    pub fn new() -> Self {
        Self {
            dispatch_id: Uuid::new_v4(),
        }
    }
}

impl Default for DispatchReceipt {
    fn default() -> Self {
        Self::new()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
