//! # Web API Error and Response Types
//!
//! Every failure is answered with a JSON body `{"code", "title", "detail"}`.
//! Server-side failures always carry the generic detail; the underlying
//! error is logged where it is converted.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

use crate::constants::GENERIC_ERROR_DETAIL;
use crate::error::{ControlError, DecodeError, FleetError, StoreError};

/// Web API errors with HTTP status code mappings
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Invalid json format.")]
    InvalidJson,

    #[error("Invalid command for target.")]
    InvalidCommand,

    #[error("Something went wrong.")]
    Internal,
}

/// JSON error body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub title: String,
    pub detail: String,
}

/// Body of an accepted task submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn success() -> Self {
        Self {
            status: "success".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidJson | ApiError::InvalidCommand => StatusCode::BAD_REQUEST,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> ErrorResponse {
        let status = self.status_code();
        let detail = match self {
            ApiError::Internal => GENERIC_ERROR_DETAIL.to_string(),
            other => other.to_string(),
        };
        ErrorResponse {
            code: status.as_u16().to_string(),
            title: status.canonical_reason().unwrap_or("Error").to_string(),
            detail,
        }
    }

    /// Log `error` server-side and answer with the generic 500
    pub fn internal(context: &str, error: &dyn std::error::Error) -> Self {
        error!(context = %context, error = %error, "Request failed");
        ApiError::Internal
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.body())).into_response()
    }
}

impl From<DecodeError> for ApiError {
    fn from(err: DecodeError) -> Self {
        debug!(error = %err, "Rejecting undecodable request body");
        ApiError::InvalidJson
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::internal("result query", &err)
    }
}

impl From<ControlError> for ApiError {
    fn from(err: ControlError) -> Self {
        ApiError::internal("fleet supervisor", &err)
    }
}

impl From<FleetError> for ApiError {
    fn from(err: FleetError) -> Self {
        match err {
            FleetError::InvalidCommand { .. } => {
                debug!(error = %err, "Rejecting fleet command");
                ApiError::InvalidCommand
            }
            FleetError::Control(control) => control.into(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
