//! # RPC Transport Contract
//!
//! Provider-agnostic request/response calls to scan workers.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::MessagingError;

/// Request/response channel to the scan worker pool
///
/// Implementations must be safe to share across tasks; the dispatcher calls
/// `invoke` concurrently from independent spawned units.
#[async_trait]
pub trait RpcTransport: Send + Sync + 'static {
    /// Invoke `procedure` on some worker and wait for its reply
    async fn invoke(&self, procedure: &str, payload: Value) -> Result<Value, MessagingError>;

    /// Provider name for logging
    fn provider_name(&self) -> &'static str;
}

/// Request envelope published to the worker request queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    pub method: String,
    pub payload: Value,
}

impl RpcRequest {
    pub fn new(method: impl Into<String>, payload: Value) -> Self {
        Self {
            method: method.into(),
            payload,
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, MessagingError> {
        serde_json::to_vec(self).map_err(|e| MessagingError::message_serialization(e.to_string()))
    }
}

/// Reply envelope published by a worker to the reply queue
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RpcReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RpcReply {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MessagingError> {
        serde_json::from_slice(bytes)
            .map_err(|e| MessagingError::message_deserialization(e.to_string()))
    }

    /// Convert into the invocation outcome; a reported error wins over a result
    pub fn into_result(self, procedure: &str) -> Result<Value, MessagingError> {
        match self.error {
            Some(message) => Err(MessagingError::remote(procedure, message)),
            None => Ok(self.result.unwrap_or(Value::Null)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_envelope_shape() {
        let request = RpcRequest::new("scan", json!({"targets": ["10.0.0.1"]}));
        let bytes = request.to_bytes().unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value, json!({"method": "scan", "payload": {"targets": ["10.0.0.1"]}}));
    }

    #[test]
    fn test_reply_error_becomes_remote_error() {
        let reply = RpcReply::from_bytes(br#"{"error":"no capacity"}"#).unwrap();
        assert_eq!(
            reply.into_result("scan"),
            Err(MessagingError::remote("scan", "no capacity"))
        );
    }

    #[test]
    fn test_reply_without_result_is_null() {
        let reply = RpcReply::from_bytes(b"{}").unwrap();
        assert_eq!(reply.into_result("scan"), Ok(Value::Null));
    }

    #[test]
    fn test_malformed_reply_rejected() {
        let err = RpcReply::from_bytes(b"not json").unwrap_err();
        assert!(matches!(err, MessagingError::MessageDeserialization { .. }));
    }
}
